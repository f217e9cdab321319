//! Embedded Diesel migrations, applied at startup.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub(crate) const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
#[error("failed to apply migrations: {message}")]
pub struct MigrationError {
    message: String,
}

/// Apply all pending embedded migrations against the given database.
///
/// Diesel's migration harness is synchronous, so this runs on a blocking
/// thread; call it once before the pool starts serving requests.
pub async fn apply_migrations(database_url: &str) -> Result<(), MigrationError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut connection = PgConnection::establish(&database_url).map_err(|err| {
            MigrationError {
                message: err.to_string(),
            }
        })?;
        connection
            .run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| MigrationError {
                message: err.to_string(),
            })
    })
    .await
    .map_err(|err| MigrationError {
        message: format!("migration task panicked: {err}"),
    })?
}
