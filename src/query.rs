//! Incremental `WHERE` clause builder.
//!
//! Predicates are kept in insertion order. The display string is always the
//! template followed by every predicate rendered as
//! `combinator column operator value`, space-joined, so a head predicate
//! (empty combinator) leaves a double space after `WHERE`.

use log::debug;

use crate::error::QueryError;
use crate::models::{Attribute, Combinator, Operator, ValueKind, EVENTS_TABLE};

pub const SQL_TEMPLATE: &str = "SELECT * FROM adas_events WHERE ";

/// Row cap appended to every search unless configured otherwise.
pub const DEFAULT_ROW_LIMIT: u32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlBind {
    Text(String),
    Int(i64),
    Real(f64),
}

/// Parameterized form of the accumulated query, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub binds: Vec<SqlBind>,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub combinator: Combinator,
    pub attribute: &'static Attribute,
    pub operator: Operator,
    /// Value before quoting or wildcards. Numeric values are stored trimmed.
    pub value: String,
}

impl Predicate {
    pub fn column(&self) -> &'static str {
        self.attribute.column
    }

    fn display_value(&self) -> String {
        match self.attribute.kind {
            ValueKind::Text => format!("'%{}%'", self.value.replace('\'', "''")),
            ValueKind::Numeric => self.value.clone(),
        }
    }

    fn bind(&self) -> SqlBind {
        match self.attribute.kind {
            ValueKind::Text => SqlBind::Text(format!("%{}%", self.value)),
            ValueKind::Numeric => parse_number(&self.value).unwrap_or_else(|| SqlBind::Text(self.value.clone())),
        }
    }

    /// The four parts joined by single spaces.
    pub fn render(&self) -> String {
        [self.combinator.as_str(), self.column(), self.operator.as_str(), &self.display_value()].join(" ")
    }
}

fn parse_number(raw: &str) -> Option<SqlBind> {
    let t = raw.trim();
    if let Ok(i) = t.parse::<i64>() {
        return Some(SqlBind::Int(i));
    }
    t.parse::<f64>().ok().filter(|f| f.is_finite()).map(SqlBind::Real)
}

#[derive(Debug, Clone)]
pub struct QueryState {
    predicates: Vec<Predicate>,
    rendered: String,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self { predicates: Vec::new(), rendered: SQL_TEMPLATE.to_string() }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn count(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.predicates.iter().any(|p| p.column() == attribute.column)
    }

    /// Appends one predicate. The first predicate never carries a combinator.
    pub fn add(&mut self, attribute: &'static Attribute, operator: Operator, value: &str, combinator: Combinator) -> Result<(), QueryError> {
        if value.is_empty() {
            return Err(QueryError::EmptyValue);
        }
        if !attribute.allowed_operators().contains(&operator) {
            return Err(QueryError::OperatorNotAllowed { column: attribute.column, operator: operator.as_str() });
        }
        if attribute.kind == ValueKind::Numeric && parse_number(value).is_none() {
            return Err(QueryError::NotNumeric { column: attribute.column, value: value.to_string() });
        }
        // numeric values are shown exactly as they are bound
        let value = match attribute.kind {
            ValueKind::Numeric => value.trim(),
            ValueKind::Text => value,
        };
        let combinator = if self.predicates.is_empty() { Combinator::None } else { combinator };
        let predicate = Predicate { combinator, attribute, operator, value: value.to_string() };
        debug!("query: add {}", predicate.render());
        self.predicates.push(predicate);
        self.rendered = self.render();
        Ok(())
    }

    /// Drops every predicate on `attribute`'s column. Returns how many were removed.
    pub fn remove(&mut self, attribute: &Attribute) -> usize {
        let before = self.predicates.len();
        self.predicates.retain(|p| p.column() != attribute.column);
        let removed = before - self.predicates.len();
        if self.predicates.is_empty() {
            self.clear();
            return removed;
        }
        if let Some(head) = self.predicates.first_mut() {
            head.combinator = Combinator::None;
        }
        self.rendered = self.render();
        debug!("query: removed {} predicate(s) on {}", removed, attribute.column);
        removed
    }

    pub fn clear(&mut self) {
        self.predicates.clear();
        self.rendered = SQL_TEMPLATE.to_string();
    }

    pub fn render(&self) -> String {
        let body: Vec<String> = self.predicates.iter().map(Predicate::render).collect();
        format!("{}{}", SQL_TEMPLATE, body.join(" "))
    }

    /// Text kept in sync by `add`/`remove`/`clear`.
    pub fn sql_text(&self) -> &str {
        &self.rendered
    }

    /// Display string with the row cap, as submitted on search.
    pub fn submitted_sql(&self, limit: u32) -> String {
        format!("{} LIMIT {}", self.sql_text(), limit)
    }

    pub fn statement(&self, limit: u32) -> Result<SqlStatement, QueryError> {
        if self.predicates.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        let mut sql = format!("SELECT * FROM {} WHERE", EVENTS_TABLE);
        let mut binds = Vec::with_capacity(self.predicates.len());
        for p in &self.predicates {
            if p.combinator != Combinator::None {
                sql.push(' ');
                sql.push_str(p.combinator.as_str());
            }
            sql.push_str(&format!(" {} {} ?", p.column(), p.operator.as_str()));
            binds.push(p.bind());
        }
        sql.push_str(" LIMIT ?");
        Ok(SqlStatement { sql, binds, limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::find_attribute;

    fn a(name: &str) -> &'static Attribute {
        find_attribute(name).unwrap()
    }

    #[test]
    fn empty_state_renders_template() {
        let q = QueryState::new();
        assert_eq!(q.render(), SQL_TEMPLATE);
        assert_eq!(q.sql_text(), SQL_TEMPLATE);
        assert_eq!(q.count(), 0);
    }

    #[test]
    fn statement_uses_placeholders() {
        let mut q = QueryState::new();
        q.add(a("vehicle"), Operator::Like, "JPP297", Combinator::Or).unwrap();
        q.add(a("lane_change"), Operator::Ge, "2", Combinator::Or).unwrap();
        q.add(a("drive_in_lane"), Operator::Lt, "87.5", Combinator::And).unwrap();
        let st = q.statement(50).unwrap();
        assert_eq!(st.sql, "SELECT * FROM adas_events WHERE vehicle LIKE ? OR lane_change >= ? AND drive_in_lane < ? LIMIT ?");
        assert_eq!(st.binds, vec![SqlBind::Text("%JPP297%".into()), SqlBind::Int(2), SqlBind::Real(87.5)]);
        assert_eq!(st.limit, 50);
    }

    #[test]
    fn numeric_values_display_as_bound() {
        let mut q = QueryState::new();
        q.add(a("lane_change"), Operator::Gt, " 2 ", Combinator::None).unwrap();
        assert_eq!(q.sql_text(), "SELECT * FROM adas_events WHERE  lane_change > 2");
        assert_eq!(q.predicates()[0].value, "2");
        assert_eq!(q.statement(5).unwrap().binds, vec![SqlBind::Int(2)]);

        q.add(a("vehicle"), Operator::Like, " JPP ", Combinator::And).unwrap();
        assert!(q.sql_text().ends_with("AND vehicle LIKE '% JPP %'"));
    }

    #[test]
    fn statement_rejects_empty_query() {
        assert_eq!(QueryState::new().statement(10), Err(QueryError::EmptyQuery));
    }

    #[test]
    fn quotes_in_text_values_are_doubled_for_display_only() {
        let mut q = QueryState::new();
        q.add(a("log_name"), Operator::Like, "o'brien", Combinator::None).unwrap();
        assert!(q.render().ends_with("log_name LIKE '%o''brien%'"));
        let st = q.statement(1).unwrap();
        assert_eq!(st.binds[0], SqlBind::Text("%o'brien%".into()));
    }
}
