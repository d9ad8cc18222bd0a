use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::models::{Profile, ProfileFields, ProfileFilter, ProfileQuery};
use crate::services::store::{ProfileStore, StoreError};

const PROFILE_COLUMNS: &str = "id, first_name, last_name, email, gender, date_of_birth, industry, salary, years_of_experience";

/// PostgreSQL-backed profile store
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
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

    /// Create a new store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

/// Append ` WHERE ...` for every set filter, with bound values
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProfileFilter) {
    if *filter == ProfileFilter::default() {
        return;
    }

    builder.push(" WHERE ");
    let mut conditions = builder.separated(" AND ");

    macro_rules! eq {
        ($column:literal, $value:expr) => {
            if let Some(value) = $value {
                conditions.push(concat!($column, " = "));
                conditions.push_bind_unseparated(value);
            }
        };
    }

    eq!("first_name", filter.first_name.clone());
    eq!("last_name", filter.last_name.clone());
    eq!("email", filter.email.clone());
    eq!("gender", filter.gender.clone());
    eq!("date_of_birth", filter.date_of_birth);
    eq!("industry", filter.industry.clone());
    eq!("salary", filter.salary);
    eq!("years_of_experience", filter.years_of_experience);
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn list(&self, query: &ProfileQuery) -> Result<Vec<Profile>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {PROFILE_COLUMNS} FROM profiles"));
        push_filter(&mut builder, &query.filter);

        // Column names come from a closed enum, never from the request
        builder.push(" ORDER BY ");
        for ordering in &query.ordering {
            builder
                .push(ordering.field.column())
                .push(if ordering.descending { " DESC, " } else { " ASC, " });
        }
        builder.push("id ASC");

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        if query.offset > 0 {
            builder.push(" OFFSET ").push_bind(query.offset);
        }

        let profiles = builder
            .build_query_as::<Profile>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Fetched {} profiles", profiles.len());

        Ok(profiles)
    }

    async fn count(&self, filter: &ProfileFilter) -> Result<i64, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM profiles");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(count)
    }

    async fn get(&self, id: i64) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");

        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn create(&self, fields: ProfileFields) -> Result<Profile, StoreError> {
        let query = format!(
            r#"
            INSERT INTO profiles
                (first_name, last_name, email, gender, date_of_birth, industry, salary, years_of_experience)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(&fields.email)
            .bind(&fields.gender)
            .bind(fields.date_of_birth)
            .bind(&fields.industry)
            .bind(fields.salary)
            .bind(fields.years_of_experience)
            .fetch_one(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn update(&self, id: i64, fields: ProfileFields) -> Result<Option<Profile>, StoreError> {
        let query = format!(
            r#"
            UPDATE profiles
            SET
                first_name = $2, last_name = $3, email = $4, gender = $5,
                date_of_birth = $6, industry = $7, salary = $8, years_of_experience = $9
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(&fields.email)
            .bind(&fields.gender)
            .bind(fields.date_of_birth)
            .bind(&fields.industry)
            .bind(fields.salary)
            .bind(fields.years_of_experience)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
