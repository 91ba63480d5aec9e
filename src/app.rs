//! Toolkit-independent state of the finder window and its query dialog.
//!
//! The GUI binary only draws this model and forwards user events to it.
//! Checkbox state is never edited directly: `sync_checkboxes` recomputes it
//! from the predicate list after every mutation.

use anyhow::Result;
use log::{info, warn};
use std::path::Path;

use crate::db::{self, EventsDb, OpenOutcome, SchemaStatus};
use crate::error::QueryError;
use crate::export::{export_to_csv, export_to_mat};
use crate::models::{attribute_index, Attribute, Combinator, Operator, ATTRIBUTES, ATTRIBUTE_COUNT};
use crate::query::{QueryState, DEFAULT_ROW_LIMIT};

pub const MSG_DB_SUCCESS: &str = "The database has been loaded successfully.\nAll available schemas are available to be selected and used.";
pub const MSG_DB_FAIL: &str = "Loaded database does not have ADAS schemas.\nProvide proper database.";
pub const MSG_NOT_DB: &str = "Loaded file is not recognised as a SQL database.\nSchema check routine will be ignored until a proper database is loaded.";
pub const MSG_SQL_EMPTY: &str = "Make sure to provide at least one query";

/// Shown in the query box while no predicate exists.
pub const QUERY_PLACEHOLDER: &str = "SELECT * FROM [table_name] WHERE [queries]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Info(s) | Self::Warning(s) => s,
        }
    }
}

/// Single-predicate entry for one attribute.
#[derive(Debug, Clone)]
pub struct QueryDialog {
    pub attribute: &'static Attribute,
    pub operator: Operator,
    pub value: String,
    pub combinator: Combinator,
    pub error: Option<String>,
}

impl QueryDialog {
    pub fn new(attribute: &'static Attribute) -> Self {
        Self {
            attribute,
            operator: attribute.default_operator(),
            value: String::new(),
            combinator: Combinator::CHOICES[0],
            error: None,
        }
    }

    pub fn title(&self) -> String {
        self.attribute.display_label()
    }

    pub fn help(&self) -> &'static str {
        self.attribute.help
    }

    pub fn operators(&self) -> &'static [Operator] {
        self.attribute.allowed_operators()
    }
}

#[derive(Debug)]
pub struct FinderSession {
    db: Option<EventsDb>,
    db_status: Option<SchemaStatus>,
    query: QueryState,
    checked: [bool; ATTRIBUTE_COUNT],
    results: Vec<String>,
    dialog: Option<QueryDialog>,
    row_limit: u32,
    pub notice: Option<Notice>,
    pub status: String,
}

impl Default for FinderSession {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_LIMIT)
    }
}

impl FinderSession {
    pub fn new(row_limit: u32) -> Self {
        Self {
            db: None,
            db_status: None,
            query: QueryState::new(),
            checked: [false; ATTRIBUTE_COUNT],
            results: Vec::new(),
            dialog: None,
            row_limit,
            notice: None,
            status: "Idle".into(),
        }
    }

    /// Query controls are usable only with a schema-checked database.
    pub fn front_end_enabled(&self) -> bool {
        self.db.is_some()
    }

    pub fn db_status(&self) -> Option<SchemaStatus> {
        self.db_status
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn checked(&self) -> &[bool] {
        &self.checked
    }

    pub fn is_checked(&self, attribute: &Attribute) -> bool {
        attribute_index(attribute).is_some_and(|i| self.checked[i])
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn dialog(&self) -> Option<&QueryDialog> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut QueryDialog> {
        self.dialog.as_mut()
    }

    pub fn sql_display(&self) -> &str {
        if self.query.is_empty() { QUERY_PLACEHOLDER } else { self.query.sql_text() }
    }

    /// Opens `path`, replacing any previous session state.
    pub async fn open_database(&mut self, path: &Path) -> Result<SchemaStatus> {
        if let Some(old) = self.db.take() {
            old.close().await;
        }
        self.clear_query();
        self.results.clear();
        self.dialog = None;
        self.db_status = None;

        let outcome = db::open(path).await?;
        let status = outcome.status();
        match outcome {
            OpenOutcome::Connected(handle) => {
                self.db = Some(handle);
                self.notice = Some(Notice::Info(MSG_DB_SUCCESS.into()));
                self.status = format!("Loaded {}", path.display());
            }
            OpenOutcome::SchemaMissing(msg) => {
                self.notice = Some(Notice::Warning(MSG_DB_FAIL.into()));
                self.status = format!("Schema check failed: {}", msg);
            }
            OpenOutcome::NotADatabase(msg) => {
                self.notice = Some(Notice::Warning(MSG_NOT_DB.into()));
                self.status = format!("Not a database: {}", msg);
            }
        }
        self.db_status = Some(status);
        Ok(status)
    }

    /// Handles a click on an attribute checkbox. Checking opens the query
    /// dialog; unchecking removes every predicate on that column.
    pub fn toggle_checkbox(&mut self, attribute: &'static Attribute, checked: bool) {
        if !self.front_end_enabled() {
            return;
        }
        if checked {
            self.open_dialog(attribute);
        } else {
            self.remove_attribute(attribute);
        }
    }

    pub fn open_dialog(&mut self, attribute: &'static Attribute) {
        if !self.front_end_enabled() || self.dialog.is_some() {
            return;
        }
        info!("[Query] editing {}", attribute.column);
        self.dialog = Some(QueryDialog::new(attribute));
    }

    /// Appends the dialog's predicate. On rejection the dialog stays open with the message.
    pub fn submit_dialog(&mut self) -> Result<(), QueryError> {
        let Some(d) = self.dialog.as_mut() else { return Ok(()) };
        match self.query.add(d.attribute, d.operator, &d.value, d.combinator) {
            Ok(()) => {
                self.dialog = None;
                self.sync_checkboxes();
                self.status = format!("{} clause(s)", self.query.count());
                Ok(())
            }
            Err(e) => {
                d.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
        self.sync_checkboxes();
    }

    pub fn remove_attribute(&mut self, attribute: &Attribute) {
        let n = self.query.remove(attribute);
        info!("[Query] removed {} clause(s) on {}", n, attribute.column);
        self.sync_checkboxes();
    }

    /// Reset button: empties the query and unchecks every box.
    pub fn clear_query(&mut self) {
        self.query.clear();
        self.sync_checkboxes();
    }

    pub fn sync_checkboxes(&mut self) {
        for (i, a) in ATTRIBUTES.iter().enumerate() {
            self.checked[i] = self.query.contains(a);
        }
    }

    /// Runs the accumulated query. An empty query only raises a notice.
    pub async fn search(&mut self) -> Result<usize> {
        let Some(handle) = self.db.as_ref() else {
            self.notice = Some(Notice::Warning(MSG_NOT_DB.into()));
            return Ok(0);
        };
        let statement = match self.query.statement(self.row_limit) {
            Ok(s) => s,
            Err(QueryError::EmptyQuery) => {
                self.notice = Some(Notice::Warning(MSG_SQL_EMPTY.into()));
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };
        info!("[Query] {}", self.query.submitted_sql(self.row_limit));
        match handle.search(&statement).await {
            Ok(names) => {
                self.results = names;
                self.status = format!("{} log file(s) found", self.results.len());
                Ok(self.results.len())
            }
            Err(e) => {
                warn!("[Query] {:#}", e);
                self.status = format!("Search failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    pub fn export_csv(&mut self, path: &Path) -> Result<()> {
        export_to_csv(&self.results, path)?;
        self.status = format!("Results saved to {}", path.display());
        Ok(())
    }

    pub fn export_mat(&mut self, path: &Path) -> Result<()> {
        export_to_mat(&self.results, path)?;
        self.status = format!("Results saved to {}", path.display());
        Ok(())
    }
}
