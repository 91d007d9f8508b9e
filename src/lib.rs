//! # Rebuttal Graph
//!
//! Takes one sentence of East Asian parental reasoning ("I've eaten more salt
//! than you've eaten rice, so listen to me"), asks an OpenAI-compatible chat
//! completion endpoint to decompose it into a small argument graph, and
//! serves the result as an interactive page: numbered fallacy labels on the
//! edges, a criticism panel per edge, and a one-line rebuttal to copy.
//!
//! ## Architecture
//!
//! ```text
//! Browser / CLI → axum server → AnalysisService → chat completion (HTTP)
//!                      ↓
//!               SessionStore (memory)
//! ```
//!
//! Every provider reply passes [`analysis::validate_analysis`] before anything
//! renders it.
//!
//! ## Example
//!
//! ```ignore
//! use rebuttal_graph::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     server::serve(config).await?;
//!     Ok(())
//! }
//! ```

/// Data model, schema validation and the analysis pipeline.
pub mod analysis;
/// Client for the HTTP API of a running server.
pub mod api_client;
/// Command-line interface.
pub mod cli;
/// Configuration loaded from the environment.
pub mod config;
/// SVG rendering of the argument graph.
pub mod diagram;
/// Error types and result aliases.
pub mod error;
/// Text export and clipboard.
pub mod export;
/// Node placement.
pub mod layout;
/// HTML escaping helpers.
pub mod markup;
/// Criticism panel.
pub mod panel;
/// Prompts sent to the model.
pub mod prompts;
/// Chat-completion provider client.
pub mod provider;
/// HTTP server.
pub mod server;
/// Per-session storage of the latest analysis.
pub mod session;

pub use analysis::{AnalysisResult, AnalysisService};
pub use config::Config;
pub use error::{AnalyzeError, AppError, AppResult, ErrorCode};
pub use server::{create_router, AppState, SharedState};
