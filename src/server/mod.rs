//! HTTP server: routes, shared state and session cookies.
//!
//! HTML pages live at `/` and `/result`, JSON endpoints under `/api`.

mod error;
mod handlers;
mod pages;

pub use error::{ApiError, ApiResult, NO_ANALYSIS_MESSAGE};
pub use pages::{render_index, render_no_data, render_result, EXAMPLE_INPUT};

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::analysis::AnalysisService;
use crate::config::Config;
use crate::error::AppResult;
use crate::provider::ProviderClient;
use crate::session::SessionStore;

/// Application state shared across handlers.
pub struct AppState {
    pub config: Config,
    pub analysis: AnalysisService,
    pub sessions: SessionStore,
}

impl AppState {
    /// Build the provider client, analysis service and session store.
    ///
    /// A missing API key does not fail here; each analysis reports it.
    pub fn new(config: Config) -> AppResult<Self> {
        let client = ProviderClient::new(&config.provider, config.request.clone())?;
        if !client.has_credential() {
            warn!("OPENAI_API_KEY is not set; analysis requests will fail until it is configured");
        }
        let analysis = AnalysisService::new(client, &config);
        Ok(Self::with_service(config, analysis))
    }

    pub fn with_service(config: Config, analysis: AnalysisService) -> Self {
        let sessions = SessionStore::new(config.server.session_ttl_secs);
        Self {
            config,
            analysis,
            sessions,
        }
    }
}

/// Shared application state
pub type SharedState = Arc<AppState>;

/// Session id read from (or about to be set on) the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionCookie {
    pub id: String,
    /// No usable cookie came with the request.
    pub is_new: bool,
}

/// Find the session cookie `name` in the request, or mint a new id.
///
/// Only values that parse as a UUID are accepted.
pub(crate) fn resolve_session(headers: &HeaderMap, name: &str) -> SessionCookie {
    let existing = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && uuid::Uuid::parse_str(value).is_ok())
        .map(|(_, value)| value.to_string());

    match existing {
        Some(id) => SessionCookie { id, is_new: false },
        None => SessionCookie {
            id: SessionStore::new_session_id(),
            is_new: true,
        },
    }
}

/// Set the session cookie on `response` when the session was just created.
pub(crate) fn attach_session_cookie(response: &mut Response, name: &str, session: &SessionCookie) {
    if !session.is_new {
        return;
    }
    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, session.id);
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "Session cookie name is not a valid header value"),
    }
}

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::index))
        .route("/analyze", post(pages::analyze))
        .route("/result", get(pages::result))
        .route("/static/app.css", get(pages::stylesheet))
        .route("/static/app.js", get(pages::script))
        // API
        .route("/health", get(handlers::health))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/result", get(handlers::result))
        .route("/api/export", get(handlers::export_text))
        .route("/api/session/clear", post(handlers::clear_session))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Bind `config.server.bind_addr` and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: Config) -> AppResult<()> {
    let addr = config.server.bind_addr;
    let state = Arc::new(AppState::new(config)?);
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
