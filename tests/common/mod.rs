#![allow(dead_code)]

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct EventRow {
    pub log_name: &'static str,
    pub upload_date: &'static str,
    pub vehicle: &'static str,
    pub drive_in_lane: f64,
    pub lane_change: i64,
}

pub const ROWS: [EventRow; 4] = [
    EventRow { log_name: "log_0001.mat", upload_date: "2017-05-30", vehicle: "JPP297", drive_in_lane: 92.5, lane_change: 1 },
    EventRow { log_name: "log_0002.mat", upload_date: "2017-05-31", vehicle: "JPP297", drive_in_lane: 71.0, lane_change: 4 },
    EventRow { log_name: "log_0003.mat", upload_date: "2017-06-02", vehicle: "AES256", drive_in_lane: 88.0, lane_change: 3 },
    EventRow { log_name: "log_0004.mat", upload_date: "2017-06-02", vehicle: "AES256", drive_in_lane: 99.0, lane_change: 0 },
];

async fn write_db(path: &Path, statements: &[String]) {
    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);
    let pool = SqlitePoolOptions::new().max_connections(1).connect_with(opts).await.unwrap();
    for s in statements {
        sqlx::query(s).execute(&pool).await.unwrap();
    }
    pool.close().await;
}

/// Creates `events.db` with the full `adas_events` schema and the rows above.
pub async fn events_db(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("events.db");
    let mut stmts = vec![
        "CREATE TABLE adas_events (id INTEGER PRIMARY KEY, log_name TEXT, upload_date TEXT, vehicle TEXT, \
         drive_in_lane REAL, stop_and_go INTEGER, lane_change INTEGER, veh_enters_host_lane INTEGER, \
         veh_leaves_host_lane INTEGER, lane_merge INTEGER, vru_in_host_lane INTEGER, vru_on_road INTEGER, \
         animal_on_road INTEGER, obstacle_in_host_lane INTEGER, obstacle_on_road INTEGER, vehicle_standstill INTEGER)"
            .to_string(),
    ];
    for r in ROWS.iter() {
        stmts.push(format!(
            "INSERT INTO adas_events (log_name, upload_date, vehicle, drive_in_lane, stop_and_go, lane_change, \
             veh_enters_host_lane, veh_leaves_host_lane, lane_merge, vru_in_host_lane, vru_on_road, animal_on_road, \
             obstacle_in_host_lane, obstacle_on_road, vehicle_standstill) \
             VALUES ('{}', '{}', '{}', {}, 0, {}, 0, 0, 0, 0, 0, 0, 0, 0, 0)",
            r.log_name, r.upload_date, r.vehicle, r.drive_in_lane, r.lane_change
        ));
    }
    write_db(&path, &stmts).await;
    path
}

/// A valid SQLite file without `adas_events`.
pub async fn foreign_db(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("other.db");
    write_db(&path, &["CREATE TABLE trips (id INTEGER PRIMARY KEY, name TEXT)".to_string()]).await;
    path
}

/// A plain text file.
pub fn not_a_db(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("notes.db");
    std::fs::write(&path, "this is not a database\n".repeat(64)).unwrap();
    path
}
