// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use clap::{Parser, Subcommand};
use schemars::schema_for;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config;
use crate::runner;

type LogInitFn =
    fn(
        &config::LogConfig,
    )
        -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "wkit.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs a graph file (.yaml, .yml or .json) and prints a JSON summary
    Run {
        /// Path to the graph definition
        graph: PathBuf,
        /// Clear the wireless channel registry before the run
        #[arg(long)]
        clear: bool,
    },
    /// Lists every registered node kind as JSON
    Nodes,
    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate a default config file and print it to stdout
    Default,
    /// Generate a JSON schema for the config and print it to stdout
    Schema,
}

/// Handle the "run" command
/// Exits the process with status code 1 on any failure
// Allow eprintln before logging is initialized (CLI output)
#[allow(clippy::disallowed_macros)]
async fn handle_run_command(
    config_path: &str,
    graph: &Path,
    clear: bool,
    init_logging: LogInitFn,
) {
    let config_result = match config::load(config_path) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        },
    };

    let _log_guard = match init_logging(&config_result.config.log) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            std::process::exit(1);
        },
    };

    if let Some(missing_file) = &config_result.file_missing {
        warn!(config_path = %missing_file, "Config file not found, using defaults");
    }

    let mut engine_config = config_result.config.engine;
    engine_config.clear_channels_before_run |= clear;
    info!(
        graph = %graph.display(),
        wireless_ordering = engine_config.wireless_ordering,
        clear_channels_before_run = engine_config.clear_channels_before_run,
        output_cache = engine_config.output_cache,
        "Starting wkit run"
    );

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            ctrl_c_token.cancel();
        }
    });

    match runner::run_graph_file(&engine_config, graph, &token).await {
        Ok(report) => match serde_json::to_string_pretty(&report.to_json()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize run summary: {e}");
                std::process::exit(1);
            },
        },
        Err(e) => {
            error!(error = %format!("{e:#}"), "Run failed");
            eprintln!("{e:#}");
            std::process::exit(1);
        },
    }
}

/// Handle the "nodes" command - print node definitions to stdout
#[allow(clippy::disallowed_macros)]
fn handle_nodes_command() {
    match serde_json::to_string_pretty(&runner::node_definitions()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize node definitions: {e}");
            std::process::exit(1);
        },
    }
}

/// Handle the "config default" command - print default config to stdout
// Allow println for CLI output to stdout (intentional)
#[allow(clippy::disallowed_macros)]
fn handle_config_default_command() {
    match config::generate_default() {
        Ok(toml_string) => {
            println!("# Default wkit configuration file");
            println!("{toml_string}");
        },
        Err(e) => {
            eprintln!("Failed to generate default config: {e}");
            std::process::exit(1);
        },
    }
}

/// Handle the "config schema" command - print JSON schema to stdout
// Allow println for CLI output to stdout (intentional)
#[allow(clippy::disallowed_macros)]
fn handle_config_schema_command() {
    let schema = schema_for!(config::Config);
    match serde_json::to_string_pretty(&schema) {
        Ok(json) => {
            println!("{json}");
        },
        Err(e) => {
            eprintln!("Failed to generate config schema: {e}");
            std::process::exit(1);
        },
    }
}

/// Handle CLI commands
pub async fn handle_command(cli: &Cli, init_logging: LogInitFn) {
    match &cli.command {
        Commands::Run { graph, clear } => {
            handle_run_command(&cli.config, graph, *clear, init_logging).await;
        },
        Commands::Nodes => handle_nodes_command(),
        Commands::Config(ConfigCommands::Default) => handle_config_default_command(),
        Commands::Config(ConfigCommands::Schema) => handle_config_schema_command(),
    }
}
