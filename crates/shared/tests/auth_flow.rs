use async_trait::async_trait;
use chrono::{Duration, Utc};
use prometheus_client::registry::Registry;
use shared::abstract_trait::{
    DynEmailService, DynHashing, DynJwtService, DynUserCommandRepository, DynUserQueryRepository,
    EmailServiceTrait, UserCommandRepositoryTrait, UserQueryRepositoryTrait,
};
use shared::config::{Hashing, JwtConfig, VerificationConfig};
use shared::domain::requests::{
    CreateUserRecord, EmailRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
    VerifyEmailParams,
};
use shared::errors::{RepositoryError, ServiceError};
use shared::model::User;
use shared::service::{AuthService, AuthServiceDeps};
use shared::utils::Metrics;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::Mutex;

#[derive(Default)]
struct InMemoryUsers {
    rows: Mutex<HashMap<String, User>>,
    seq: AtomicI32,
}

impl InMemoryUsers {
    async fn pending_token(&self, email: &str) -> Option<String> {
        self.rows
            .lock()
            .await
            .get(email)
            .and_then(|user| user.pending_verification_token.clone())
    }

    async fn is_verified(&self, email: &str) -> bool {
        self.rows
            .lock()
            .await
            .get(email)
            .map(|user| user.verified)
            .unwrap_or(false)
    }

    async fn expire_token(&self, email: &str) {
        let mut rows = self.rows.lock().await;
        let user = rows.get_mut(email).expect("user should exist");
        user.verification_expires_at = Some((Utc::now() - Duration::hours(1)).naive_utc());
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.rows.lock().await.get(email).cloned())
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for InMemoryUsers {
    async fn create_user(&self, record: &CreateUserRecord) -> Result<User, RepositoryError> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&record.email) {
            return Err(RepositoryError::AlreadyExists("email".to_string()));
        }

        let now = Utc::now().naive_utc();
        let user = User {
            user_id: self.seq.fetch_add(1, Ordering::SeqCst) + 1,
            email: record.email.clone(),
            password_hash: record.password_hash.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            phone: record.phone.clone(),
            verified: false,
            pending_verification_token: Some(record.pending_verification_token.clone()),
            verification_expires_at: Some(record.verification_expires_at),
            created_at: now,
            updated_at: now,
        };

        rows.insert(record.email.clone(), user.clone());
        Ok(user)
    }

    async fn mark_verified(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let mut rows = self.rows.lock().await;
        let Some(user) = rows.get_mut(email) else {
            return Ok(None);
        };

        if user.pending_verification_token.as_deref() != Some(token) {
            return Ok(None);
        }

        user.verified = true;
        user.pending_verification_token = None;
        user.verification_expires_at = None;
        user.updated_at = Utc::now().naive_utc();
        Ok(Some(user.clone()))
    }

    async fn update_profile(
        &self,
        email: &str,
        req: &UpdateProfileRequest,
    ) -> Result<User, RepositoryError> {
        let mut rows = self.rows.lock().await;
        let user = rows.get_mut(email).ok_or(RepositoryError::NotFound)?;

        if let Some(first_name) = &req.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &req.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(phone) = &req.phone {
            user.phone = Some(phone.clone());
        }
        user.updated_at = Utc::now().naive_utc();
        Ok(user.clone())
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<EmailRequest>>,
}

#[async_trait]
impl EmailServiceTrait for RecordingMailer {
    async fn send(&self, req: &EmailRequest) -> Result<(), ServiceError> {
        self.sent.lock().await.push(req.clone());
        Ok(())
    }
}

struct FailingMailer;

#[async_trait]
impl EmailServiceTrait for FailingMailer {
    async fn send(&self, _req: &EmailRequest) -> Result<(), ServiceError> {
        Err(ServiceError::Mail("relay refused connection".to_string()))
    }
}

struct TestAuth {
    auth: AuthService,
    users: Arc<InMemoryUsers>,
    mailer: Arc<RecordingMailer>,
    jwt: DynJwtService,
}

async fn auth_with_mailer(mailer: DynEmailService) -> (AuthService, Arc<InMemoryUsers>) {
    let users = Arc::new(InMemoryUsers::default());
    let jwt = Arc::new(JwtConfig::new("test-secret", 60)) as DynJwtService;

    let deps = AuthServiceDeps {
        hash: Arc::new(Hashing::new()) as DynHashing,
        jwt,
        mailer,
        user_query: users.clone() as DynUserQueryRepository,
        user_command: users.clone() as DynUserCommandRepository,
        verification: VerificationConfig {
            public_url: "http://localhost:5000".to_string(),
            ttl_hours: 24,
        },
        metrics: Arc::new(Mutex::new(Metrics::new())),
        registry: Arc::new(Mutex::new(Registry::default())),
    };

    let auth = AuthService::new(deps).await.expect("auth service");
    (auth, users)
}

async fn test_auth() -> TestAuth {
    let users = Arc::new(InMemoryUsers::default());
    let mailer = Arc::new(RecordingMailer::default());
    let jwt = Arc::new(JwtConfig::new("test-secret", 60)) as DynJwtService;

    let deps = AuthServiceDeps {
        hash: Arc::new(Hashing::new()) as DynHashing,
        jwt: jwt.clone(),
        mailer: mailer.clone() as DynEmailService,
        user_query: users.clone() as DynUserQueryRepository,
        user_command: users.clone() as DynUserCommandRepository,
        verification: VerificationConfig {
            public_url: "http://localhost:5000".to_string(),
            ttl_hours: 24,
        },
        metrics: Arc::new(Mutex::new(Metrics::new())),
        registry: Arc::new(Mutex::new(Registry::default())),
    };

    let auth = AuthService::new(deps).await.expect("auth service");
    TestAuth {
        auth,
        users,
        mailer,
        jwt,
    }
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: "hunter2secret".to_string(),
        first_name: Some("Mara".to_string()),
        last_name: None,
        phone: None,
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn login_before_verification_is_rejected() {
    let t = test_auth().await;

    t.auth
        .register
        .register(&register_request("mara@example.com"))
        .await
        .expect("registration should succeed");

    let err = t
        .auth
        .login
        .login(&login_request("mara@example.com", "hunter2secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotVerified));
}

#[tokio::test]
async fn redeeming_the_emailed_token_unlocks_login() {
    let t = test_auth().await;
    let email = "mara@example.com";

    t.auth
        .register
        .register(&register_request(email))
        .await
        .expect("registration should succeed");

    let token = t.users.pending_token(email).await.expect("pending token");

    let redeemed = t
        .auth
        .verify
        .redeem(&VerifyEmailParams {
            token: token.clone(),
            email: email.to_string(),
        })
        .await
        .expect("redemption should succeed");
    assert!(redeemed.data.verified);

    let login = t
        .auth
        .login
        .login(&login_request(email, "hunter2secret"))
        .await
        .expect("login should succeed after verification");

    assert_eq!(login.data.token_type, "bearer");
    let subject = t
        .jwt
        .verify_token(&login.data.access_token)
        .expect("issued token should validate");
    assert_eq!(subject, email);
}

#[tokio::test]
async fn verification_email_carries_the_redeem_link() {
    let t = test_auth().await;
    let email = "mara@example.com";

    t.auth
        .register
        .register(&register_request(email))
        .await
        .expect("registration should succeed");

    let token = t.users.pending_token(email).await.expect("pending token");

    let sent = t.mailer.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, email);
    assert!(sent[0].data.link.contains("/auth/verify?token="));
    assert!(sent[0].data.link.contains(&token));
    assert!(sent[0].data.link.contains("mara%40example.com"));
}

#[tokio::test]
async fn duplicate_email_is_rejected_regardless_of_password() {
    let t = test_auth().await;

    t.auth
        .register
        .register(&register_request("mara@example.com"))
        .await
        .expect("first registration should succeed");

    let mut second = register_request("mara@example.com");
    second.password = "a-different-password".to_string();

    let err = t.auth.register.register(&second).await.unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateEmail));
}

#[tokio::test]
async fn wrong_token_is_rejected_and_account_stays_unverified() {
    let t = test_auth().await;
    let email = "mara@example.com";

    t.auth
        .register
        .register(&register_request(email))
        .await
        .expect("registration should succeed");

    let err = t
        .auth
        .verify
        .redeem(&VerifyEmailParams {
            token: "not-the-right-token".to_string(),
            email: email.to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidVerification));
    assert!(!t.users.is_verified(email).await);
    assert!(t.users.pending_token(email).await.is_some());
}

#[tokio::test]
async fn token_cannot_be_redeemed_twice() {
    let t = test_auth().await;
    let email = "mara@example.com";

    t.auth
        .register
        .register(&register_request(email))
        .await
        .expect("registration should succeed");

    let token = t.users.pending_token(email).await.expect("pending token");
    let params = VerifyEmailParams {
        token,
        email: email.to_string(),
    };

    t.auth
        .verify
        .redeem(&params)
        .await
        .expect("first redemption should succeed");

    let err = t.auth.verify.redeem(&params).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidVerification));
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let t = test_auth().await;
    let email = "mara@example.com";

    t.auth
        .register
        .register(&register_request(email))
        .await
        .expect("registration should succeed");

    let token = t.users.pending_token(email).await.expect("pending token");
    t.users.expire_token(email).await;

    let err = t
        .auth
        .verify
        .redeem(&VerifyEmailParams {
            token,
            email: email.to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::VerificationExpired));
    assert!(!t.users.is_verified(email).await);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_answer_identically() {
    let t = test_auth().await;
    let email = "mara@example.com";

    t.auth
        .register
        .register(&register_request(email))
        .await
        .expect("registration should succeed");
    let token = t.users.pending_token(email).await.expect("pending token");
    t.auth
        .verify
        .redeem(&VerifyEmailParams {
            token,
            email: email.to_string(),
        })
        .await
        .expect("redemption should succeed");

    let wrong_password = t
        .auth
        .login
        .login(&login_request(email, "wrong-password"))
        .await
        .unwrap_err();
    let unknown_email = t
        .auth
        .login
        .login(&login_request("nobody@example.com", "hunter2secret"))
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
    assert!(matches!(unknown_email, ServiceError::InvalidCredentials));
}

#[tokio::test]
async fn mailer_failure_does_not_fail_registration() {
    let (auth, users) = auth_with_mailer(Arc::new(FailingMailer) as DynEmailService).await;

    let response = auth
        .register
        .register(&register_request("mara@example.com"))
        .await
        .expect("registration should survive a dead mail relay");

    assert_eq!(response.status, "success");
    assert!(!response.data.verified);
    assert!(users.pending_token("mara@example.com").await.is_some());
}

#[tokio::test]
async fn profile_update_merges_only_present_fields() {
    let t = test_auth().await;
    let email = "mara@example.com";

    t.auth
        .register
        .register(&register_request(email))
        .await
        .expect("registration should succeed");

    let updated = t
        .auth
        .identity
        .update_me(
            email,
            &UpdateProfileRequest {
                first_name: None,
                last_name: Some("Reyes".to_string()),
                phone: Some("09171234567".to_string()),
            },
        )
        .await
        .expect("profile update should succeed");

    assert_eq!(updated.data.first_name.as_deref(), Some("Mara"));
    assert_eq!(updated.data.last_name.as_deref(), Some("Reyes"));
    assert_eq!(updated.data.phone.as_deref(), Some("09171234567"));

    let me = t.auth.identity.get_me(email).await.expect("get_me");
    assert_eq!(me.data.last_name.as_deref(), Some("Reyes"));
}
