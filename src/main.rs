use clap::Parser;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rebuttal_graph::{
    api_client::ApiClient,
    cli::{execute_analyze, Cli, CliResult, Command},
    config::{Config, LogFormat},
    export::{CommandClipboard, Exporter},
    server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    match cli.command() {
        Command::Serve => {
            info!(
                version = env!("CARGO_PKG_VERSION"),
                "Rebuttal Graph server starting..."
            );
            if let Err(e) = server::serve(config).await {
                error!(error = %e, "Server error");
                return Err(e.into());
            }
            Ok(())
        }
        Command::Analyze {
            text,
            server: server_url,
            copy,
            json,
        } => {
            let client = ApiClient::new(&server_url, Duration::from_millis(config.request.timeout_ms))?;

            let exporter = match copy {
                Some(_) => match CommandClipboard::detect() {
                    Ok(clipboard) => Some(Exporter::new(clipboard)),
                    Err(e) => {
                        error!(error = %e, "No clipboard available");
                        None
                    }
                },
                None => None,
            };

            let result: CliResult =
                execute_analyze(&client, exporter.as_ref(), &text, copy, json).await;
            if result.exit_code == 0 {
                println!("{}", result.message);
            } else {
                eprintln!("{}", result.message);
            }
            std::process::exit(result.exit_code);
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
