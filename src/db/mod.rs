pub mod connection;
pub mod schema;

pub use connection::{open, open_pool, OpenOutcome};
pub use schema::{check_schema, search_log_names, EventsDb, SchemaStatus};
