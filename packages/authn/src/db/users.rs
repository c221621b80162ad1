//! `users` table access.

use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::{NewUser, Principal, User};
use crate::store::UserStore;

/// [`UserStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for PgUserStore {
    async fn find_unique(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user.map(User::into_principal))
    }

    async fn create_user(&self, user: NewUser) -> Result<Principal, StoreError> {
        let result: Result<User, sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, name, image, provider, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.image)
        .bind(user.account.provider())
        .bind(user.account.password_hash())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into_principal()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Conflict(user.email))
            }
            Err(e) => Err(e.into()),
        }
    }
}
