//! User repository implementation.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use sous_core::{
    CreateUserRequest, Error, Result, UpdateProfileRequest, User, UserRepository,
};

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> User {
        User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            is_admin: row.get("is_admin"),
            email_verified: row.get("email_verified"),
            verification_token: row.get("verification_token"),
            verification_token_expires_at: row.get("verification_token_expires_at"),
            reset_token: row.get("reset_token"),
            reset_token_expires_at: row.get("reset_token_expires_at"),
            allergies: row.get("allergies"),
            dietary_restriction: row.get("dietary_restriction"),
            last_login_at: row.get("last_login_at"),
            last_active_at: row.get("last_active_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }

    const USER_COLUMNS: &'static str = "id, name, email, password_hash, is_admin, \
         email_verified, verification_token, verification_token_expires_at, reset_token, \
         reset_token_expires_at, allergies, dietary_restriction, last_login_at, \
         last_active_at, created_at, updated_at, deleted_at";
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, req: CreateUserRequest) -> Result<Uuid> {
        let id = Uuid::now_v7();

        sqlx::query(
            "INSERT INTO app_user (id, name, email, password_hash, is_admin, email_verified, \
             allergies, dietary_restriction, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, false, false, $5, $6, now(), now())",
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.password_hash)
        .bind(&req.allergies)
        .bind(&req.dietary_restriction)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::InvalidInput(format!("email already registered: {}", req.email))
            }
            other => Error::Database(other),
        })?;

        debug!(
            subsystem = "db",
            component = "users",
            op = "insert",
            user_id = %id,
            "User created"
        );
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<User> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM app_user WHERE id = $1 AND deleted_at IS NULL",
            Self::USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::UserNotFound(id))?;

        Ok(Self::row_to_user(&row))
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM app_user WHERE email = $1 AND deleted_at IS NULL",
            Self::USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::row_to_user))
    }

    async fn update_profile(&self, id: Uuid, req: UpdateProfileRequest) -> Result<()> {
        let result = sqlx::query(
            "UPDATE app_user SET \
             name = COALESCE($2, name), \
             allergies = COALESCE($3, allergies), \
             dietary_restriction = COALESCE($4, dietary_restriction), \
             updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.allergies)
        .bind(&req.dietary_restriction)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound(id));
        }
        Ok(())
    }

    async fn touch_login(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE app_user SET last_login_at = now(), last_active_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound(id));
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE app_user SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound(id));
        }
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE app_user SET deleted_at = NULL, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound(id));
        }
        Ok(())
    }
}
