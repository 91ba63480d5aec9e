pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod query;
