use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::env;
use std::time::Duration;

/// Open the report store from `DATABASE_URL`. Postgres in deployment; the
/// sqlite backend is compiled in as well, so a `sqlite:` URL works for
/// local runs. SQLite gets a single connection — in-memory databases exist
/// per connection, and file databases lock on concurrent writers anyway.
pub async fn get_database() -> Result<DatabaseConnection> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let is_sqlite = database_url.starts_with("sqlite:");

    let max_connections: u32 = if is_sqlite {
        1
    } else {
        env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    };

    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(max_connections)
        .connect_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    Database::connect(opt)
        .await
        .context("failed to connect to the report store")
}
