use crate::{
    abstract_trait::UserCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{CreateUserRecord, UpdateProfileRequest},
    errors::RepositoryError,
    model::User as UserModel,
};
use async_trait::async_trait;

pub struct UserCommandRepository {
    db: ConnectionPool,
}

impl UserCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for UserCommandRepository {
    async fn create_user(&self, record: &CreateUserRecord) -> Result<UserModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let user = sqlx::query_as::<_, UserModel>(
            r#"
            INSERT INTO users (
                email,
                password_hash,
                first_name,
                last_name,
                phone,
                verified,
                pending_verification_token,
                verification_expires_at,
                created_at,
                updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, FALSE, $6, $7, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP
            )
            RETURNING *
            "#,
        )
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.phone)
        .bind(&record.pending_verification_token)
        .bind(record.verification_expires_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "email"))?;

        Ok(user)
    }

    async fn mark_verified(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<UserModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        // Token match and flag flip happen in one statement, so two
        // concurrent redemptions cannot both succeed.
        let user = sqlx::query_as::<_, UserModel>(
            r#"
            UPDATE users
            SET verified = TRUE,
                pending_verification_token = NULL,
                verification_expires_at = NULL,
                updated_at = CURRENT_TIMESTAMP
            WHERE email = $1
              AND pending_verification_token = $2
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(token)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        email: &str,
        req: &UpdateProfileRequest,
    ) -> Result<UserModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let user = sqlx::query_as::<_, UserModel>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                updated_at = CURRENT_TIMESTAMP
            WHERE email = $1
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.phone)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        user.ok_or(RepositoryError::NotFound)
    }
}
