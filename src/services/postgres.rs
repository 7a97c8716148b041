use crate::models::RawProfile;
use crate::services::source::{ProfileSource, StoreError};
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

/// PostgreSQL-backed profile store
///
/// Profiles live in the `user_profiles` table. Multi-valued attributes are
/// TEXT columns holding either comma-separated tokens or JSON text; the
/// normalizer handles both.
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Create a new store from a connection string and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings, filling in pool defaults
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL profile store");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool (migrations are the caller's responsibility)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Post-creation hook for the account service
    ///
    /// Creates an empty, active profile row for a newly registered user.
    /// Existing rows are left untouched. Returns true when a row was inserted.
    pub async fn on_user_created(&self, user_id: &str, name: &str) -> Result<bool, StoreError> {
        let query = r#"
            INSERT INTO user_profiles (user_id, name, is_active, created_at, updated_at)
            VALUES ($1, $2, TRUE, NOW(), NOW())
            ON CONFLICT (user_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        let created = result.rows_affected() > 0;
        if created {
            tracing::info!("Created empty profile for new user {}", user_id);
        }

        Ok(created)
    }
}

fn text_column(row: &PgRow, column: &str) -> Result<Value, sqlx::Error> {
    let value: Option<String> = row.try_get(column)?;
    Ok(value.map(Value::String).unwrap_or(Value::Null))
}

fn raw_profile_from_row(row: &PgRow) -> Result<RawProfile, sqlx::Error> {
    Ok(RawProfile {
        id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        skills: text_column(row, "skills")?,
        skill_categories: text_column(row, "skill_categories")?,
        interests: text_column(row, "interests")?,
        startup_industries: text_column(row, "startup_industries")?,
        startup_goals: text_column(row, "startup_goals")?,
        experience_level: row.try_get("experience_level")?,
    })
}

impl ProfileSource for PostgresProfileStore {
    async fn fetch_active_profiles(&self) -> Result<Vec<RawProfile>, StoreError> {
        let query = r#"
            SELECT user_id, name, skills, skill_categories, interests,
                   startup_industries, startup_goals, experience_level
            FROM user_profiles
            WHERE is_active = TRUE
            ORDER BY created_at, user_id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let profiles = rows
            .iter()
            .map(raw_profile_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} active profiles from PostgreSQL", profiles.len());

        Ok(profiles)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
