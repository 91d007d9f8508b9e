//! JSON and text endpoints under `/api`.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::{attach_session_cookie, resolve_session, SharedState};
use crate::analysis::validate_request;
use crate::error::{AnalyzeError, ValidationErrors};
use crate::export::{export, ExportScope};
use crate::session::SessionEntry;

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /api/analyze`
///
/// The body is read raw so that malformed JSON reports `INVALID_INPUT` like
/// any other bad request.
pub async fn analyze(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        AnalyzeError::Validation(ValidationErrors::single(
            "$",
            format!("请求体必须是有效的JSON: {}", e),
        ))
    })?;
    let request = validate_request(&value).map_err(AnalyzeError::Validation)?;

    let result = state.analysis.analyze(&request.input).await?;

    let session = resolve_session(&headers, &state.config.server.session_cookie);
    state
        .sessions
        .save(&session.id, request.input, result.clone())
        .await;
    info!(new_session = session.is_new, "Stored analysis in session");

    let mut response = Json(result).into_response();
    attach_session_cookie(&mut response, &state.config.server.session_cookie, &session);
    Ok(response)
}

/// `GET /api/result`
pub async fn result(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionEntry>> {
    let entry = stored_entry(&state, &headers).await?;
    Ok(Json(entry))
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub scope: ExportScope,
}

/// `GET /api/export?scope=all|core`
pub async fn export_text(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let entry = stored_entry(&state, &headers).await?;
    let text = export(&entry.result, query.scope);

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response())
}

/// `POST /api/session/clear`
pub async fn clear_session(State(state): State<SharedState>, headers: HeaderMap) -> StatusCode {
    let session = resolve_session(&headers, &state.config.server.session_cookie);
    if !session.is_new {
        let cleared = state.sessions.clear(&session.id).await;
        info!(cleared, "Cleared session");
    }
    StatusCode::NO_CONTENT
}

async fn stored_entry(state: &SharedState, headers: &HeaderMap) -> ApiResult<SessionEntry> {
    let session = resolve_session(headers, &state.config.server.session_cookie);
    if session.is_new {
        return Err(ApiError::NoAnalysis);
    }
    state
        .sessions
        .get(&session.id)
        .await
        .ok_or(ApiError::NoAnalysis)
}
