use anyhow::{Context, Result};
use log::info;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};

use crate::models::EVENTS_TABLE;
use crate::query::{SqlBind, SqlStatement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Present,
    Missing,
    NotADatabase,
}

/// Classifies a driver error message the way the schema probe needs it.
pub fn classify_message(msg: &str) -> SchemaStatus {
    if msg.starts_with("no such table") {
        SchemaStatus::Missing
    } else {
        SchemaStatus::NotADatabase
    }
}

/// Probes `adas_events`; database errors become a status, anything else propagates.
pub async fn check_schema(pool: &SqlitePool) -> Result<(SchemaStatus, String)> {
    let sql = format!("SELECT 1 FROM {} LIMIT 1", EVENTS_TABLE);
    match sqlx::query(&sql).fetch_optional(pool).await {
        Ok(_) => Ok((SchemaStatus::Present, String::new())),
        Err(sqlx::Error::Database(db)) => {
            let msg = db.message().to_string();
            Ok((classify_message(&msg), msg))
        }
        Err(e) => Err(e).context("Schema check failed"),
    }
}

/// Open, schema-checked handle on an events database.
#[derive(Debug, Clone)]
pub struct EventsDb {
    pool: SqlitePool,
    path: PathBuf,
}

impl EventsDb {
    pub fn new(pool: SqlitePool, path: &Path) -> Self {
        Self { pool, path: path.to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn search(&self, statement: &SqlStatement) -> Result<Vec<String>> {
        search_log_names(&self.pool, statement).await
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Runs the statement and returns column 1 (the log name) of every row.
pub async fn search_log_names(pool: &SqlitePool, statement: &SqlStatement) -> Result<Vec<String>> {
    let mut q = sqlx::query(&statement.sql);
    for b in &statement.binds {
        q = match b {
            SqlBind::Text(s) => q.bind(s.clone()),
            SqlBind::Int(i) => q.bind(*i),
            SqlBind::Real(f) => q.bind(*f),
        };
    }
    q = q.bind(i64::from(statement.limit));
    let rows = q
        .fetch_all(pool)
        .await
        .with_context(|| format!("Search failed: {}", statement.sql))?;
    let names = rows.iter().map(log_name).collect::<Result<Vec<_>>>()?;
    info!("[DB] {} row(s) matched (limit {})", names.len(), statement.limit);
    Ok(names)
}

fn log_name(row: &SqliteRow) -> Result<String> {
    if let Ok(v) = row.try_get::<Option<String>, _>(1) {
        return Ok(v.unwrap_or_default());
    }
    if let Ok(v) = row.try_get::<i64, _>(1) {
        return Ok(v.to_string());
    }
    let v: f64 = row.try_get(1).context("Column 1 is not a log name")?;
    Ok(v.to_string())
}
