use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QueryError;

/// Table every query runs against.
pub const EVENTS_TABLE: &str = "adas_events";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Matched with `LIKE '%value%'`.
    Text,
    /// Compared raw with one of the comparison operators.
    Numeric,
}

/// Static description of one queryable column of `adas_events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub key: &'static str,
    pub label: &'static str,
    pub column: &'static str,
    pub help: &'static str,
    pub kind: ValueKind,
}

impl Attribute {
    /// Menu label with the mnemonic marker removed.
    pub fn display_label(&self) -> String {
        self.label.replace('&', "")
    }

    pub fn allowed_operators(&self) -> &'static [Operator] {
        match self.kind {
            ValueKind::Text => &[Operator::Like],
            ValueKind::Numeric => &[Operator::Eq, Operator::Gt, Operator::Ge, Operator::Lt],
        }
    }

    pub fn default_operator(&self) -> Operator {
        self.allowed_operators()[0]
    }
}

const fn attr(key: &'static str, label: &'static str, column: &'static str, help: &'static str, kind: ValueKind) -> Attribute {
    Attribute { key, label, column, help, kind }
}

pub const ATTRIBUTE_COUNT: usize = 15;

pub static ATTRIBUTES: [Attribute; ATTRIBUTE_COUNT] = [
    attr("lname", "&Log Name", "log_name", "Search using ADAS decoded log file (.mat)", ValueKind::Text),
    attr("ldate", "&Upload Date", "upload_date", "Search using upload date following format YYYY-MM-DD, e.g. 2017-05-30, etc", ValueKind::Text),
    attr("lvn", "&Vehicle Number", "vehicle", "Search using vehicle registration number, e.g. JPP297, AES256, etc", ValueKind::Text),
    attr("ldil", "&Drive in Lane", "drive_in_lane", "Search using percentage of how centered the car (within detected lane markers) during the log", ValueKind::Numeric),
    attr("lsng", "&Stop and Go", "stop_and_go", "Search using number of host standing (stopping) and go", ValueKind::Numeric),
    attr("llc", "&Lane Change", "lane_change", "Search using number of host changing lane", ValueKind::Numeric),
    attr("lvehl", "&Vehicle Entering Host Lane", "veh_enters_host_lane", "Search using count of vehicle entering host lane", ValueKind::Numeric),
    attr("lvlhl", "&Vehicle Leaving Host Lane", "veh_leaves_host_lane", "Search using count of vehicle leaving host lane", ValueKind::Numeric),
    attr("llm", "&Lane Merge", "lane_merge", "Search using count of merged lane", ValueKind::Numeric),
    attr("lvrihl", "&VRU in Host Lane", "vru_in_host_lane", "Search using numbers of VRU in host lane", ValueKind::Numeric),
    attr("lvror", "&VRU on Road", "vru_on_road", "Search using numbers of VRU on the road", ValueKind::Numeric),
    attr("laor", "&Animal on Road", "animal_on_road", "Search using numbers of animals on the road", ValueKind::Numeric),
    attr("loihl", "&Obstacle in Host Lane", "obstacle_in_host_lane", "Search using count of obstacle in the host lane", ValueKind::Numeric),
    attr("loor", "&Obstacle on Road", "obstacle_on_road", "Search using count of obstacle on the road", ValueKind::Numeric),
    attr("lvss", "&Vehicle Standstill", "vehicle_standstill", "Search using count of stand still vehicle", ValueKind::Numeric),
];

/// Looks an attribute up by internal key, column name or display label.
pub fn find_attribute(name: &str) -> Option<&'static Attribute> {
    let n = name.trim();
    ATTRIBUTES.iter().find(|a| {
        a.key == n || a.column == n || a.label == n || a.display_label().eq_ignore_ascii_case(n)
    })
}

/// Position of `attribute` in the catalog, `None` for an attribute built outside it.
pub fn attribute_index(attribute: &Attribute) -> Option<usize> {
    ATTRIBUTES.iter().position(|a| a == attribute)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator { Eq, Gt, Ge, Lt, Le, Like }

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Like => "LIKE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "==" | "=" => Some(Self::Eq),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            "~" => Some(Self::Like),
            t if t.eq_ignore_ascii_case("like") => Some(Self::Like),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Combinator {
    /// Head of the clause list.
    #[default]
    None,
    And,
    Or,
}

impl Combinator {
    /// Choices offered by the query dialog, in display order.
    pub const CHOICES: [Combinator; 2] = [Self::Or, Self::And];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    pub fn parse(s: &str) -> Result<Self, QueryError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" => Ok(Self::None),
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            _ => Err(QueryError::MalformedFilter(s.to_string())),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
