use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    url: String,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    acquire_timeout_secs: u64,
    #[serde(default)]
    run_migrations: bool,
}

fn default_max_connections() -> u32 {
    8
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl DatabaseConfig {
    pub async fn new_pool(&self) -> anyhow::Result<sqlx::PgPool> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .min_connections(1)
            .max_connections(self.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(self.acquire_timeout_secs))
            .connect(&self.url)
            .await
            .context("Error connecting to database")?;

        if self.run_migrations {
            tracing::info!("Applying database migrations");
            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .context("Error applying database migrations")?;
        }

        Ok(pool)
    }
}
