use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{FinderConfig, ENV_DB, ENV_LIMIT};
use crate::error::{ConfigError, QueryError};
use crate::models::{find_attribute, Attribute, Combinator, Operator};
use crate::query::{QueryState, DEFAULT_ROW_LIMIT};

#[derive(Parser, Debug)]
#[command(
    name = "adas_finder",
    version,
    about = "Search an ADAS event database for log files (CLI)",
    disable_help_subcommand = true,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    /// SQLite database containing `adas_events` (env: ADAS_FINDER_DB)
    #[arg(value_name = "DB", env = ENV_DB)]
    pub database: Option<PathBuf>,
    /// Filter as <attribute><op><value>, e.g. vehicle~JPP297 or lane_change>2.
    /// Joined with AND; prefix with `or:` to join with OR
    #[arg(short = 'w', long = "where", value_name = "FILTER")]
    pub filters: Vec<String>,
    /// Row cap appended to the query (env: ADAS_FINDER_LIMIT, default 1000)
    #[arg(long, value_name = "N", env = ENV_LIMIT)]
    pub limit: Option<u32>,
    /// Write matching log names to a CSV file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
    /// Write matching log names to a MATLAB .mat file (variable `results`)
    #[arg(long, value_name = "PATH")]
    pub mat: Option<PathBuf>,
    /// Print the generated SQL before searching
    #[arg(long)]
    pub print_sql: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// List the queryable attributes
    Attributes,
}

impl Cli {
    pub fn to_config(&self) -> Result<FinderConfig, ConfigError> {
        let cfg = FinderConfig {
            database: self.database.clone(),
            row_limit: self.limit.unwrap_or(DEFAULT_ROW_LIMIT),
            ..FinderConfig::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub combinator: Combinator,
    pub attribute: &'static Attribute,
    pub operator: Operator,
    pub value: String,
}

const OPERATOR_TOKENS: [&str; 7] = [">=", "<=", "==", ">", "<", "=", "~"];

pub fn parse_filter(raw: &str) -> Result<Filter, QueryError> {
    let mut s = raw.trim();
    let mut combinator = Combinator::And;
    if let Some((prefix, rest)) = s.split_once(':') {
        if let Ok(c) = Combinator::parse(prefix) {
            if c != Combinator::None {
                combinator = c;
                s = rest.trim_start();
            }
        }
    }
    let start = s.find(|c| matches!(c, '<' | '>' | '=' | '~')).ok_or_else(|| QueryError::MalformedFilter(raw.to_string()))?;
    let tail = &s[start..];
    let token = OPERATOR_TOKENS
        .iter()
        .find(|t| tail.starts_with(**t))
        .ok_or_else(|| QueryError::MalformedFilter(raw.to_string()))?;
    let name = s[..start].trim();
    let value = tail[token.len()..].trim();
    if name.is_empty() {
        return Err(QueryError::MalformedFilter(raw.to_string()));
    }
    let attribute = find_attribute(name).ok_or_else(|| QueryError::UnknownAttribute(name.to_string()))?;
    let operator = Operator::parse(token).ok_or_else(|| QueryError::MalformedFilter(raw.to_string()))?;
    Ok(Filter { combinator, attribute, operator, value: value.to_string() })
}

/// Folds `--where` filters into a query, in the order given.
pub fn build_query(filters: &[String]) -> Result<QueryState, QueryError> {
    let mut q = QueryState::new();
    for raw in filters {
        let f = parse_filter(raw)?;
        q.add(f.attribute, f.operator, &f.value, f.combinator)?;
    }
    Ok(q)
}
