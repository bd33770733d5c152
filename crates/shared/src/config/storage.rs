use crate::{abstract_trait::StorageServiceTrait, config::StorageConfig, errors::StorageError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Thin client for the Supabase storage REST API. Object uploads, bucket
/// creation, and signed-URL issuance are the only operations this backend
/// needs.
#[derive(Clone)]
pub struct StorageClient {
    config: StorageConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl StorageClient {
    pub fn new(config: StorageConfig) -> Result<Self> {
        let config = StorageConfig {
            url: config.url.trim_end_matches('/').to_string(),
            ..config
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build storage HTTP client")?;

        Ok(Self { config, http })
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.url, self.config.bucket, path
        )
    }

    fn sign_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.config.url, self.config.bucket, path
        )
    }

    fn bucket_url(&self) -> String {
        format!("{}/storage/v1/bucket", self.config.url)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.config.service_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.service_key),
            )
    }
}

#[async_trait]
impl StorageServiceTrait for StorageClient {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError> {
        let response = self
            .authed(self.http.post(self.object_url(path)))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("✅ Stored object {}/{}", self.config.bucket, path);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if body.contains("Bucket not found") {
            return Err(StorageError::BucketNotFound);
        }

        Err(StorageError::Request(format!(
            "upload failed ({status}): {body}"
        )))
    }

    async fn create_bucket(&self) -> Result<(), StorageError> {
        let response = self
            .authed(self.http.post(self.bucket_url()))
            .json(&serde_json::json!({
                "id": self.config.bucket,
                "name": self.config.bucket,
                "public": false,
            }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("✅ Created storage bucket {}", self.config.bucket);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        // Losing a creation race still leaves the bucket in place.
        if body.contains("already exists") {
            return Ok(());
        }

        Err(StorageError::Request(format!(
            "bucket creation failed ({status}): {body}"
        )))
    }

    async fn create_signed_url(
        &self,
        path: &str,
        expires_in_secs: i64,
    ) -> Result<String, StorageError> {
        let response = self
            .authed(self.http.post(self.sign_url(path)))
            .json(&serde_json::json!({ "expiresIn": expires_in_secs }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Request(format!(
                "signed URL request failed ({status}): {body}"
            )));
        }

        let signed: SignedUrlResponse = response.json().await?;

        // The API returns a path relative to /storage/v1.
        Ok(format!("{}/storage/v1{}", self.config.url, signed.signed_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> StorageClient {
        StorageClient::new(StorageConfig {
            url: "https://abc123.supabase.co/".to_string(),
            service_key: "service-key".to_string(),
            bucket: "waivers".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn object_url_construction() {
        let client = test_client();
        assert_eq!(
            client.object_url("waivers/deadbeef.pdf"),
            "https://abc123.supabase.co/storage/v1/object/waivers/waivers/deadbeef.pdf"
        );
    }

    #[test]
    fn sign_url_construction() {
        let client = test_client();
        assert_eq!(
            client.sign_url("waivers/deadbeef.pdf"),
            "https://abc123.supabase.co/storage/v1/object/sign/waivers/waivers/deadbeef.pdf"
        );
    }

    #[test]
    fn bucket_url_construction_strips_trailing_slash() {
        let client = test_client();
        assert_eq!(
            client.bucket_url(),
            "https://abc123.supabase.co/storage/v1/bucket"
        );
    }

    #[test]
    fn signed_url_response_parses_the_api_field_name() {
        let parsed: SignedUrlResponse = serde_json::from_str(
            r#"{"signedURL":"/object/sign/waivers/waivers/deadbeef.pdf?token=xyz"}"#,
        )
        .unwrap();
        assert!(parsed.signed_url.starts_with("/object/sign/waivers/"));
    }
}
