use anyhow::{Context, Result};
use log::{info, warn};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

use super::schema::{check_schema, classify_message, EventsDb, SchemaStatus};

/// Result of opening a file picked by the user.
#[derive(Debug)]
pub enum OpenOutcome {
    Connected(EventsDb),
    /// SQLite file without an `adas_events` table.
    SchemaMissing(String),
    /// The driver rejected the file outright.
    NotADatabase(String),
}

impl OpenOutcome {
    pub fn status(&self) -> SchemaStatus {
        match self {
            Self::Connected(_) => SchemaStatus::Present,
            Self::SchemaMissing(_) => SchemaStatus::Missing,
            Self::NotADatabase(_) => SchemaStatus::NotADatabase,
        }
    }
}

/// Single read-only connection; the finder never writes.
pub async fn open_pool(path: &Path) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .create_if_missing(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(opts)
        .await?;
    Ok(pool)
}

pub async fn open(path: &Path) -> Result<OpenOutcome> {
    let pool = match open_pool(path).await {
        Ok(p) => p,
        Err(e) => {
            let db_msg = e.downcast_ref::<sqlx::Error>().and_then(|se| match se {
                sqlx::Error::Database(db) => Some(db.message().to_string()),
                _ => None,
            });
            return match db_msg {
                Some(msg) => {
                    warn!("[DB] {}: {}", path.display(), msg);
                    Ok(rejected(classify_message(&msg), msg))
                }
                None => Err(e).with_context(|| format!("Failed to open {}", path.display())),
            };
        }
    };
    match check_schema(&pool).await? {
        (SchemaStatus::Present, _) => {
            info!("[DB] Loaded {}", path.display());
            Ok(OpenOutcome::Connected(EventsDb::new(pool, path)))
        }
        (status, msg) => {
            warn!("[DB] {}: {}", path.display(), msg);
            pool.close().await;
            Ok(rejected(status, msg))
        }
    }
}

fn rejected(status: SchemaStatus, msg: String) -> OpenOutcome {
    match status {
        SchemaStatus::Missing => OpenOutcome::SchemaMissing(msg),
        _ => OpenOutcome::NotADatabase(msg),
    }
}
