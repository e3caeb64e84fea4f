use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use vault_client::{NoCache, lookup};

use crate::cli::Cli;
use crate::logging::LoggingBuilder;

mod cli;
mod logging;

const EXIT_NOT_FOUND: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = LoggingBuilder::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .json_from_env()
        .init()
        .unwrap_or_else(|e| {
            eprintln!("warning: {}", e);
            None
        });

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Lookup failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let options = cli.lookup_options()?;
    let secret_uri = options.uri.clone().unwrap_or_default();

    // One lookup per process: there is no caller cache to populate.
    let outcome = lookup(&options, &NoCache)
        .await
        .context("Vault lookup failed")?;

    let Some(data) = outcome.into_data() else {
        eprintln!("No secret found at {}", secret_uri);
        return Ok(ExitCode::from(EXIT_NOT_FOUND));
    };

    let output = match &cli.key {
        Some(key) => match data.get(key) {
            Some(value) => value.clone(),
            None => {
                eprintln!("Key '{}' not found at {}", key, secret_uri);
                return Ok(ExitCode::from(EXIT_NOT_FOUND));
            }
        },
        None => serde_json::to_value(data.into_iter().collect::<BTreeMap<_, _>>())?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::SUCCESS)
}
