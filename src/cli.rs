//! Command-line interface.

use clap::{Parser, Subcommand};

use crate::api_client::ApiClient;
use crate::export::{export_all, Clipboard, ExportScope, Exporter, COPY_FAILED_MESSAGE};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "rebuttal-graph", version, about = "Map a parental argument into a fallacy graph with rebuttals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Subcommand to run; `serve` when none is given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the web server
    Serve,

    /// Analyze a sentence through a running server
    Analyze {
        /// Sentence to analyze
        text: String,

        /// Base URL of the server
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,

        /// Copy the export to the system clipboard
        #[arg(long, value_enum)]
        copy: Option<ExportScope>,

        /// Print the raw analysis as JSON instead of the text export
        #[arg(long)]
        json: bool,
    },
}

/// Result of CLI command execution.
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    pub message: String,
}

impl CliResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

/// Run `analyze` against `client`, copying with `exporter` when `copy` is set.
pub async fn execute_analyze<C: Clipboard>(
    client: &ApiClient,
    exporter: Option<&Exporter<C>>,
    text: &str,
    copy: Option<ExportScope>,
    json: bool,
) -> CliResult {
    let result = match client.analyze(text).await {
        Ok(result) => result,
        Err(e) => return CliResult::error(format!("{} ({})", e.user_message(), e.code())),
    };

    let output = if json {
        match serde_json::to_string_pretty(&result) {
            Ok(output) => output,
            Err(e) => return CliResult::error(format!("Failed to encode result: {}", e)),
        }
    } else {
        export_all(&result)
    };

    let Some(scope) = copy else {
        return CliResult::success(output);
    };
    let Some(exporter) = exporter else {
        return CliResult::error(format!("{}\n\n{}", output, COPY_FAILED_MESSAGE));
    };

    match exporter.copy(&result, scope).await {
        Ok(_) => CliResult::success(format!("{}\n\n✓ 已复制", output)),
        Err(e) => CliResult::error(format!("{}\n\n{}: {}", output, COPY_FAILED_MESSAGE, e)),
    }
}
