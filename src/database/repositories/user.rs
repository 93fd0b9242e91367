//! User repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::database::store::UserStore;
use crate::models::{Locale, User};
use crate::utils::errors::{RefTrackError, Result};

const USER_COLUMNS: &str = "user_id, first_name, referral_count, language, created_at, updated_at";

/// Raw database row. The locale is stored as text and converted at the edge
/// so an unexpected value degrades to the default instead of failing decode.
#[derive(Debug, FromRow)]
struct UserRow {
    user_id: i64,
    first_name: String,
    referral_count: i64,
    language: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, fallback_locale: Locale) -> User {
        User {
            user_id: self.user_id,
            first_name: self.first_name,
            referral_count: self.referral_count,
            language: Locale::parse(&self.language).unwrap_or(fallback_locale),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
    /// System default locale, served for users that are not registered yet
    /// and for rows whose stored code fails to parse.
    default_locale: Locale,
}

impl UserRepository {
    pub fn new(pool: PgPool, default_locale: Locale) -> Self {
        Self {
            pool,
            default_locale,
        }
    }

    async fn fetch(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row.into_user(self.default_locale)))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn ensure_user(
        &self,
        user_id: i64,
        display_name: &str,
        default_locale: Locale,
    ) -> Result<(User, bool)> {
        // ON CONFLICT DO NOTHING makes the "was newly created" flag atomic
        // with the insert itself: exactly one of two racing first visits
        // observes rows_affected = 1.
        let inserted = sqlx::query(
            r#"
            INSERT INTO users (user_id, first_name, language, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(display_name)
        .bind(default_locale.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let created = inserted.rows_affected() == 1;

        if !created {
            // Display-only refresh; referral_count and language stay untouched.
            sqlx::query("UPDATE users SET first_name = $2, updated_at = $3 WHERE user_id = $1")
                .bind(user_id)
                .bind(display_name)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;
        }

        let user = self
            .fetch(user_id)
            .await?
            .ok_or(RefTrackError::UserNotFound { user_id })?;

        Ok((user, created))
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.fetch(user_id).await
    }

    async fn credit_referral(&self, referrer_id: i64) -> Result<()> {
        // Single-row atomic increment; concurrent credits serialize on the row.
        let result = sqlx::query(
            "UPDATE users SET referral_count = referral_count + 1, updated_at = $2 WHERE user_id = $1",
        )
        .bind(referrer_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RefTrackError::UserNotFound {
                user_id: referrer_id,
            });
        }

        Ok(())
    }

    async fn set_locale(&self, user_id: i64, locale: Locale) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET language = $2, updated_at = $3 WHERE user_id = $1")
                .bind(user_id)
                .bind(locale.as_str())
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RefTrackError::UserNotFound { user_id });
        }

        Ok(())
    }

    async fn get_locale(&self, user_id: i64) -> Result<Locale> {
        let language: Option<(String,)> =
            sqlx::query_as("SELECT language FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(language
            .and_then(|(code,)| Locale::parse(&code))
            .unwrap_or(self.default_locale))
    }

    async fn referral_count(&self, user_id: i64) -> Result<i64> {
        let count: Option<(i64,)> =
            sqlx::query_as("SELECT referral_count FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(count.map(|(n,)| n).unwrap_or(0))
    }
}
