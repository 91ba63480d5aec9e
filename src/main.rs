use anyhow::{bail, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use adas_finder::app::{MSG_DB_FAIL, MSG_NOT_DB, MSG_SQL_EMPTY};
use adas_finder::cli::{build_query, Cli, Command};
use adas_finder::db::{self, OpenOutcome};
use adas_finder::error::ConfigError;
use adas_finder::export::{export_to_csv, export_to_mat};
use adas_finder::models::ATTRIBUTES;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.command == Some(Command::Attributes) {
        println!("{:<8} {:<24} {:<24} {}", "KEY", "COLUMN", "LABEL", "KIND");
        for a in ATTRIBUTES.iter() {
            println!("{:<8} {:<24} {:<24} {:?}", a.key, a.column, a.display_label(), a.kind);
        }
        return Ok(());
    }

    let cfg = cli.to_config()?;
    let Some(path) = cfg.database.as_deref() else { bail!(ConfigError::MissingField("database")) };
    let query = build_query(&cli.filters)?;
    if query.is_empty() {
        bail!(MSG_SQL_EMPTY);
    }
    if cli.print_sql {
        println!("{}", query.submitted_sql(cfg.row_limit));
    }

    let handle = match db::open(path).await? {
        OpenOutcome::Connected(h) => h,
        OpenOutcome::SchemaMissing(msg) => bail!("{} ({})", MSG_DB_FAIL, msg),
        OpenOutcome::NotADatabase(msg) => bail!("{} ({})", MSG_NOT_DB, msg),
    };
    let statement = query.statement(cfg.row_limit)?;
    let names = handle.search(&statement).await?;
    handle.close().await;

    for n in &names {
        println!("{}", n);
    }
    info!("{} log file(s) found", names.len());

    if let Some(p) = cli.csv.as_deref() {
        export_to_csv(&names, p)?;
    }
    if let Some(p) = cli.mat.as_deref() {
        export_to_mat(&names, p)?;
    }
    Ok(())
}
