use crate::{abstract_trait::JwtServiceTrait, errors::ServiceError};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    jwt_secret: String,
    ttl_minutes: i64,
}

impl JwtConfig {
    pub fn new(jwt_secret: &str, ttl_minutes: i64) -> Self {
        JwtConfig {
            jwt_secret: jwt_secret.to_string(),
            ttl_minutes,
        }
    }
}

#[async_trait]
impl JwtServiceTrait for JwtConfig {
    fn generate_token(&self, subject: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + Duration::minutes(self.ttl_minutes)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(ServiceError::Jwt)
    }

    fn verify_token(&self, token: &str) -> Result<String, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let token_data =
            decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                    ErrorKind::InvalidSignature => ServiceError::Jwt(e),
                    _ => ServiceError::TokenMalformed,
                }
            })?;

        // The library validates with leeway; the token boundary here is
        // exact. A token is dead the moment now reaches exp.
        let current_time = Utc::now().timestamp() as usize;
        if token_data.claims.exp <= current_time {
            return Err(ServiceError::TokenExpired);
        }

        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_its_subject() {
        let jwt = JwtConfig::new("test-secret", 720);
        let token = jwt.generate_token("staff@repair.example.com").unwrap();

        let subject = jwt.verify_token(&token).unwrap();
        assert_eq!(subject, "staff@repair.example.com");
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtConfig::new("test-secret", -5);
        let token = jwt.generate_token("staff@repair.example.com").unwrap();

        match jwt.verify_token(&token) {
            Err(ServiceError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn token_at_the_expiry_boundary_is_rejected() {
        let jwt = JwtConfig::new("test-secret", 0);
        let token = jwt.generate_token("staff@repair.example.com").unwrap();

        // exp == iat == now, and now >= exp must fail.
        assert!(matches!(
            jwt.verify_token(&token),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let issuer = JwtConfig::new("secret-a", 720);
        let verifier = JwtConfig::new("secret-b", 720);
        let token = issuer.generate_token("staff@repair.example.com").unwrap();

        match verifier.verify_token(&token) {
            Err(ServiceError::Jwt(_)) => {}
            other => panic!("expected signature failure, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_malformed() {
        let jwt = JwtConfig::new("test-secret", 720);

        match jwt.verify_token("not.a.jwt") {
            Err(ServiceError::TokenMalformed) => {}
            other => panic!("expected TokenMalformed, got {other:?}"),
        }
    }
}
