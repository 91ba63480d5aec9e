mod common;

use adas_finder::app::{FinderSession, Notice, MSG_DB_FAIL, MSG_DB_SUCCESS, MSG_NOT_DB, MSG_SQL_EMPTY, QUERY_PLACEHOLDER};
use adas_finder::db::SchemaStatus;
use adas_finder::error::QueryError;
use adas_finder::models::{find_attribute, Combinator, Operator};
use tempfile::TempDir;

#[tokio::test]
async fn front_end_stays_disabled_until_a_valid_database_is_open() {
    let dir = TempDir::new().unwrap();
    let mut s = FinderSession::default();
    assert!(!s.front_end_enabled());

    let status = s.open_database(&common::not_a_db(&dir)).await.unwrap();
    assert_eq!(status, SchemaStatus::NotADatabase);
    assert_eq!(s.notice, Some(Notice::Warning(MSG_NOT_DB.into())));
    assert!(!s.front_end_enabled());

    let status = s.open_database(&common::foreign_db(&dir).await).await.unwrap();
    assert_eq!(status, SchemaStatus::Missing);
    assert_eq!(s.notice, Some(Notice::Warning(MSG_DB_FAIL.into())));
    assert!(!s.front_end_enabled());

    // checkbox clicks are ignored while disabled
    s.toggle_checkbox(find_attribute("vehicle").unwrap(), true);
    assert!(s.dialog().is_none());

    let status = s.open_database(&common::events_db(&dir).await).await.unwrap();
    assert_eq!(status, SchemaStatus::Present);
    assert_eq!(s.notice, Some(Notice::Info(MSG_DB_SUCCESS.into())));
    assert!(s.front_end_enabled());
}

#[tokio::test]
async fn checkbox_dialog_search_and_uncheck() {
    let dir = TempDir::new().unwrap();
    let mut s = FinderSession::default();
    s.open_database(&common::events_db(&dir).await).await.unwrap();
    let vehicle = find_attribute("vehicle").unwrap();
    let lane_change = find_attribute("lane_change").unwrap();

    assert_eq!(s.sql_display(), QUERY_PLACEHOLDER);

    // checking opens the dialog but the box only sticks once a predicate exists
    s.toggle_checkbox(vehicle, true);
    assert!(!s.is_checked(vehicle));
    {
        let d = s.dialog_mut().unwrap();
        assert_eq!(d.title(), "Vehicle Number");
        assert_eq!(d.operators(), &[Operator::Like]);
        d.value = "JPP297".into();
    }
    s.submit_dialog().unwrap();
    assert!(s.dialog().is_none());
    assert!(s.is_checked(vehicle));
    assert_eq!(s.sql_display(), "SELECT * FROM adas_events WHERE  vehicle LIKE '%JPP297%'");

    s.open_dialog(lane_change);
    {
        let d = s.dialog_mut().unwrap();
        d.operator = Operator::Gt;
        d.value = "2".into();
        d.combinator = Combinator::And;
    }
    s.submit_dialog().unwrap();
    assert!(s.is_checked(lane_change));
    assert_eq!(s.query().count(), 2);

    assert_eq!(s.search().await.unwrap(), 1);
    assert_eq!(s.results(), &["log_0002.mat".to_string()]);

    s.toggle_checkbox(vehicle, false);
    assert!(!s.is_checked(vehicle));
    assert!(s.is_checked(lane_change));
    assert_eq!(s.sql_display(), "SELECT * FROM adas_events WHERE  lane_change > 2");

    assert_eq!(s.search().await.unwrap(), 2);
    assert_eq!(s.results(), &["log_0002.mat".to_string(), "log_0003.mat".to_string()]);

    s.toggle_checkbox(lane_change, false);
    assert_eq!(s.query().count(), 0);
    assert_eq!(s.sql_display(), QUERY_PLACEHOLDER);
    assert!(s.checked().iter().all(|c| !c));
}

#[tokio::test]
async fn empty_value_keeps_dialog_open_and_cancel_unchecks() {
    let dir = TempDir::new().unwrap();
    let mut s = FinderSession::default();
    s.open_database(&common::events_db(&dir).await).await.unwrap();
    let merge = find_attribute("lane_merge").unwrap();

    s.toggle_checkbox(merge, true);
    assert_eq!(s.submit_dialog(), Err(QueryError::EmptyValue));
    let d = s.dialog().unwrap();
    assert_eq!(d.error.as_deref(), Some("Make sure the value is not empty"));
    assert_eq!(s.query().count(), 0);

    s.cancel_dialog();
    assert!(s.dialog().is_none());
    assert!(!s.is_checked(merge));
}

#[tokio::test]
async fn empty_search_is_rejected_with_a_notice() {
    let dir = TempDir::new().unwrap();
    let mut s = FinderSession::default();
    s.open_database(&common::events_db(&dir).await).await.unwrap();
    s.notice = None;
    assert_eq!(s.search().await.unwrap(), 0);
    assert_eq!(s.notice, Some(Notice::Warning(MSG_SQL_EMPTY.into())));
    assert!(s.results().is_empty());
}

#[tokio::test]
async fn reset_and_clear_results() {
    let dir = TempDir::new().unwrap();
    let mut s = FinderSession::new(1);
    s.open_database(&common::events_db(&dir).await).await.unwrap();
    s.open_dialog(find_attribute("upload_date").unwrap());
    s.dialog_mut().unwrap().value = "2017".into();
    s.submit_dialog().unwrap();

    assert_eq!(s.search().await.unwrap(), 1);
    s.clear_results();
    assert!(s.results().is_empty());

    s.clear_query();
    assert_eq!(s.query().count(), 0);
    assert!(s.checked().iter().all(|c| !c));
}

#[tokio::test]
async fn results_export_from_session() {
    let dir = TempDir::new().unwrap();
    let mut s = FinderSession::default();
    s.open_database(&common::events_db(&dir).await).await.unwrap();
    s.open_dialog(find_attribute("vehicle").unwrap());
    s.dialog_mut().unwrap().value = "AES".into();
    s.submit_dialog().unwrap();
    s.search().await.unwrap();

    let csv = dir.path().join("out.csv");
    s.export_csv(&csv).unwrap();
    assert_eq!(std::fs::read_to_string(&csv).unwrap(), "log_0003.mat\nlog_0004.mat");

    let mat = dir.path().join("out.mat");
    s.export_mat(&mat).unwrap();
    assert!(std::fs::metadata(&mat).unwrap().len() > 128);
}

#[tokio::test]
async fn failed_open_forgets_the_previous_database() {
    let dir = TempDir::new().unwrap();
    let mut s = FinderSession::default();
    assert_eq!(s.db_status(), None);
    s.open_database(&common::events_db(&dir).await).await.unwrap();
    assert_eq!(s.db_status(), Some(SchemaStatus::Present));

    // the driver refuses file names with interior NUL before touching the disk
    let bad = dir.path().join("bad\0name.db");
    assert!(s.open_database(&bad).await.is_err());
    assert_eq!(s.db_status(), None);
    assert!(!s.front_end_enabled());
}
