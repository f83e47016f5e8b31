use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub last_login: OffsetDateTime,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub verification_token_expires_at: Option<OffsetDateTime>,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_expires_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, last_login, is_verified,
                   verification_token, verification_token_expires_at,
                   reset_password_token, reset_password_expires_at, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, last_login, is_verified,
                   verification_token, verification_token_expires_at,
                   reset_password_token, reset_password_expires_at, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create an unverified user holding a pending verification code.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
        verification_token: &str,
        verification_token_expires_at: OffsetDateTime,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, verification_token,
                               verification_token_expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, last_login, is_verified,
                      verification_token, verification_token_expires_at,
                      reset_password_token, reset_password_expires_at, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(verification_token)
        .bind(verification_token_expires_at)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn touch_last_login(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Mark the user holding this unexpired verification code as verified,
    /// clearing the code. Returns None when no such user exists.
    pub async fn verify_email(db: &PgPool, code: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_verified = TRUE,
                verification_token = NULL,
                verification_token_expires_at = NULL
            WHERE verification_token = $1
              AND verification_token_expires_at > now()
            RETURNING id, email, password_hash, name, last_login, is_verified,
                      verification_token, verification_token_expires_at,
                      reset_password_token, reset_password_expires_at, created_at
            "#,
        )
        .bind(code)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn set_reset_token(
        db: &PgPool,
        id: Uuid,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_password_token = $2, reset_password_expires_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Swap in a new password hash for the user holding this unexpired reset
    /// token, clearing the token. Returns None when no such user exists.
    pub async fn reset_password(
        db: &PgPool,
        token: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password_hash = $2,
                reset_password_token = NULL,
                reset_password_expires_at = NULL
            WHERE reset_password_token = $1
              AND reset_password_expires_at > now()
            RETURNING id, email, password_hash, name, last_login, is_verified,
                      verification_token, verification_token_expires_at,
                      reset_password_token, reset_password_expires_at, created_at
            "#,
        )
        .bind(token)
        .bind(password_hash)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}
