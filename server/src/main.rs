//! apidoc-mcp Entry Point
//!
//! Loads the API document given on the command line, then either:
//! - runs one query command and prints the result as JSON, or
//! - serves the query tools over MCP on stdio (`serve`)

use apidoc_index::ApiIndex;
use apidoc_mcp::cli::{Args, Command};
use apidoc_mcp::mcp::McpServer;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr; stdout carries protocol or command output.
    let log_filter = args.command.default_log_filter();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let index = match ApiIndex::with_config(&args.loader_config()) {
        Ok(index) => Arc::new(index),
        Err(e) => fail(e),
    };

    if let Err(e) = index.load(&args.source).await {
        fail(e);
    }

    if let Command::Serve { reload } = args.command {
        tracing::info!("Starting apidoc MCP server");
        tracing::info!("Source: {}", args.source);

        let mut server = McpServer::new(index, args.source, reload);
        if let Err(e) = server.run().await {
            tracing::error!("MCP server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let Some(operation) = args.command.operation() else {
        return;
    };

    match operation.execute(&index) {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(text) => println!("{}", text),
            Err(e) => fail(e),
        },
        Err(e) => fail(e),
    }
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}
