use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::error::AppError;

/// Connects to `database_url`, optionally applying pending migrations.
///
/// Pool acquisition is bounded by `acquire_timeout` so an unreachable
/// database fails fast at startup.
pub async fn connect_db(
    database_url: &str,
    acquire_timeout: Duration,
    run_migrations: bool,
) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(database_url.to_owned());
    opts.acquire_timeout(acquire_timeout)
        .connect_timeout(acquire_timeout)
        .sqlx_logging(false);

    // each in-memory SQLite connection is its own database
    if database_url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(opts).await?;

    if run_migrations {
        migrate(&conn, MigrationCommand::Up).await?;
        info!("database migrations applied");
    }

    Ok(conn)
}
