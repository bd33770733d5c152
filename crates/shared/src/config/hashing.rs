use crate::{abstract_trait::HashingTrait, errors::ServiceError};
use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};

#[derive(Clone)]
pub struct Hashing;

impl Hashing {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Hashing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HashingTrait for Hashing {
    async fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let hashed = hash(password, DEFAULT_COST).map_err(ServiceError::Bcrypt)?;
        Ok(hashed)
    }

    async fn compare_password(
        &self,
        hashed_password: &str,
        password: &str,
    ) -> Result<(), ServiceError> {
        let is_valid = verify(password, hashed_password).map_err(ServiceError::Bcrypt)?;
        if is_valid {
            Ok(())
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_accepts_the_original_password() {
        let hashing = Hashing::new();
        let hashed = hashing.hash_password("correct horse battery").await.unwrap();

        assert_ne!(hashed, "correct horse battery");
        assert!(
            hashing
                .compare_password(&hashed, "correct horse battery")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn different_password_is_rejected() {
        let hashing = Hashing::new();
        let hashed = hashing.hash_password("pw12345").await.unwrap();

        match hashing.compare_password(&hashed, "pw12346").await {
            Err(ServiceError::InvalidCredentials) => {}
            other => panic!("expected InvalidCredentials, got {other:?}"),
        }
    }
}
