use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sqlgen_client::config::Config;
use sqlgen_client::handler::{Outcome, SubmitHandler, Submission};
use sqlgen_client::http::ReqwestClient;
use sqlgen_client::view::TerminalView;
use tracing_subscriber::EnvFilter;

/// Ask a SQL generation service to translate a question into SQL
#[derive(Parser)]
#[command(name = "sqlgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database schema as JSON text
    #[arg(long, conflicts_with = "schema_file", required_unless_present = "schema_file")]
    schema: Option<String>,

    /// Path to a file holding the database schema JSON
    #[arg(long)]
    schema_file: Option<PathBuf>,

    /// Natural-language question
    #[arg(short, long)]
    question: String,

    /// Base URL of the service [default: $SQLGEN_BASE_URL or http://127.0.0.1:8000]
    #[arg(long)]
    base_url: Option<String>,
}

impl Cli {
    fn schema_text(&self) -> Result<String> {
        match (&self.schema, &self.schema_file) {
            (Some(schema), _) => Ok(schema.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema file {}", path.display())),
            (None, None) => anyhow::bail!("Either --schema or --schema-file is required"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr, stdout carries only the result
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let config = match &cli.base_url {
        Some(base_url) => Config::new(base_url).context("Invalid --base-url")?,
        None => Config::from_env().context("Invalid SQLGEN_BASE_URL")?,
    };
    let view = TerminalView::new(cli.schema_text()?, cli.question.clone());
    let handler = SubmitHandler::new(ReqwestClient::default(), &config);

    let exit = match handler.submit(&view).await {
        Submission::Completed(Outcome::Generated(_)) => ExitCode::SUCCESS,
        Submission::Completed(_) | Submission::Busy => ExitCode::FAILURE,
    };

    Ok(exit)
}
