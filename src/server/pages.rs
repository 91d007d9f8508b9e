//! Server-rendered HTML pages.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::fmt::Write;
use tracing::{error, info, warn};

use super::{attach_session_cookie, resolve_session, SharedState};
use crate::diagram::DiagramView;
use crate::error::format_error_message;
use crate::export::COPY_FAILED_MESSAGE;
use crate::markup::escape;
use crate::panel;
use crate::session::SessionEntry;

/// Filled in by the example button.
pub const EXAMPLE_INPUT: &str = "我吃的盐比你吃的饭还多,听我的准没错";

const STYLESHEET: &str = include_str!("../../static/app.css");
const SCRIPT: &str = include_str!("../../static/app.js");

/// `GET /`
pub async fn index() -> Html<String> {
    Html(render_index("", None))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub input: String,
}

/// `POST /analyze`
///
/// Success stores the analysis in the session and redirects to the result
/// page. Failure re-renders the form with the input kept and the message
/// shown under it.
pub async fn analyze(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<AnalyzeForm>,
) -> Response {
    match state.analysis.analyze(&form.input).await {
        Ok(result) => {
            let session = resolve_session(&headers, &state.config.server.session_cookie);
            state.sessions.save(&session.id, form.input, result).await;
            info!(new_session = session.is_new, "Stored analysis in session");

            let mut response = Redirect::to("/result").into_response();
            attach_session_cookie(&mut response, &state.config.server.session_cookie, &session);
            response
        }
        Err(err) => {
            let status =
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                error!(code = %err.code(), error = %err, "Analysis failed");
            } else {
                warn!(code = %err.code(), error = %err, "Analysis rejected");
            }

            let message = format_error_message(Some(err.code()), &err.to_string());
            (status, Html(render_index(&form.input, Some(&message)))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    pub edge: Option<String>,
}

/// `GET /result?edge=<id>`
pub async fn result(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ResultQuery>,
) -> Html<String> {
    let session = resolve_session(&headers, &state.config.server.session_cookie);
    let entry = if session.is_new {
        None
    } else {
        state.sessions.get(&session.id).await
    };

    match entry {
        Some(entry) => Html(render_result(&entry, query.edge.as_deref())),
        None => Html(render_no_data()),
    }
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT,
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/app.css">
</head>
<body>
{body}
<script src="/static/app.js"></script>
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

/// Input page, optionally with an error under the textarea.
pub fn render_index(input: &str, error: Option<&str>) -> String {
    let mut body = String::from(
        r#"<main class="home"><header><h1>东亚父母逻辑分析器</h1><p class="subtitle">输入父母的一句话,点击「生成逻辑图」开始分析</p></header>"#,
    );
    let _ = write!(
        body,
        r#"<form id="analyze-form" method="post" action="/analyze"><textarea id="input" name="input" maxlength="500" placeholder="例如:我吃的盐比你吃的饭还多,听我的准没错&#10;或:考不上前5名就别想玩手机">{}</textarea>"#,
        escape(input)
    );
    if let Some(error) = error {
        let _ = write!(
            body,
            r#"<div id="error" class="error" role="alert">{}</div>"#,
            escape(error)
        );
    }
    let _ = write!(
        body,
        r#"<div class="actions"><button id="submit" type="submit" class="primary">生成逻辑图</button><button id="example" type="button" data-example="{}">查看示例</button></div></form></main>"#,
        escape(EXAMPLE_INPUT)
    );
    page("东亚父母逻辑分析器", &body)
}

/// Result page for a stored analysis with `edge` selected.
pub fn render_result(entry: &SessionEntry, edge: Option<&str>) -> String {
    let result = &entry.result;
    let diagram = DiagramView::new(&result.logic_graph).with_selection(edge);
    let panel = panel::render(&result.criticisms, edge);
    let fail = escape(COPY_FAILED_MESSAGE);

    let mut body = String::new();
    let _ = write!(
        body,
        r#"<nav class="top"><a class="button" href="/">← 返回</a><h1>分析结果</h1><button type="button" data-copy="all" data-fail-message="{fail}">复制全部</button></nav>"#
    );
    let _ = write!(
        body,
        r#"<section class="one-punch"><div class="inner"><div class="head"><div><h2>【核心反驳】</h2><p class="meta">句型：{sentence_type}</p><p class="meta">原句：{input}</p></div><button type="button" data-copy="core" data-fail-message="{fail}">复制</button></div><p class="text">{one_punch}</p></div></section>"#,
        sentence_type = escape(&result.sentence_type),
        input = escape(&entry.input),
        one_punch = escape(&result.one_punch),
    );
    body.push_str(
        r#"<div class="content"><div class="guide"><p><strong>💡 如何使用？</strong></p><ul><li><strong>方框</strong>：父母这句话里包含的各个论点</li><li><strong>连线上的数字标签</strong>：标出了论点之间推导的逻辑漏洞</li><li><strong>点击数字标签</strong>：查看右侧的详细批判（❌攻击、📎要证据、🪞类比）</li></ul></div>"#,
    );
    let _ = write!(
        body,
        r#"<div class="columns"><div class="card">{}</div><div class="card">{}</div></div>"#,
        diagram.render_svg(),
        panel.to_html()
    );

    if let Some(rebuttals) = result.harsh_rebuttals.as_ref().filter(|r| !r.is_empty()) {
        body.push_str(r#"<details class="harsh"><summary>🔥 强硬反驳</summary><ul>"#);
        for rebuttal in rebuttals {
            let _ = write!(body, "<li>{}</li>", escape(rebuttal));
        }
        body.push_str("</ul></details>");
    }
    body.push_str("</div>");

    page("分析结果", &body)
}

/// Shown when the session holds no analysis.
pub fn render_no_data() -> String {
    page(
        "分析结果",
        r#"<div class="empty-page"><div><p>没有分析数据</p><a class="button" href="/">返回首页</a></div></div>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::validate_analysis;
    use crate::prompts::EXAMPLE_ANALYSIS;
    use chrono::Utc;

    fn entry() -> SessionEntry {
        let value: serde_json::Value = serde_json::from_str(EXAMPLE_ANALYSIS).unwrap();
        SessionEntry {
            input: EXAMPLE_INPUT.to_string(),
            result: validate_analysis(&value).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_index_has_form_and_example() {
        let html = render_index("", None);
        assert!(html.contains(r#"action="/analyze""#));
        assert!(html.contains(EXAMPLE_INPUT));
        assert!(!html.contains(r#"class="error""#));
    }

    #[test]
    fn test_index_keeps_input_and_shows_error() {
        let html = render_index("<考不上>", Some("AI 服务暂时不可用，请稍后重试"));
        assert!(html.contains("&lt;考不上&gt;</textarea>"));
        let textarea = html.find("</textarea>").unwrap();
        let error = html.find("AI 服务暂时不可用").unwrap();
        assert!(error > textarea);
    }

    #[test]
    fn test_result_without_selection_shows_prompt() {
        let html = render_result(&entry(), None);
        assert!(html.contains("【核心反驳】"));
        assert!(html.contains(&entry().result.one_punch));
        assert!(html.contains(panel::PROMPT_TEXT));
        assert!(html.contains(r#"data-copy="core""#));
        assert!(html.contains(r#"data-copy="all""#));
        assert!(html.contains("强硬反驳"));
    }

    #[test]
    fn test_result_with_selection_shows_attacks() {
        let entry = entry();
        let html = render_result(&entry, Some("edge_1"));
        let attack = &entry.result.criticism_for("edge_1").unwrap().attacks[0];
        assert!(html.contains(&escape(attack)));
        assert!(html.contains("url(#arrowhead-selected)"));
    }

    #[test]
    fn test_result_with_unknown_edge_shows_not_found() {
        let html = render_result(&entry(), Some("edge_9"));
        assert!(html.contains(panel::NOT_FOUND_TEXT));
        assert!(!html.contains("url(#arrowhead-selected)"));
    }

    #[test]
    fn test_no_data_page_links_home() {
        let html = render_no_data();
        assert!(html.contains("没有分析数据"));
        assert!(html.contains(r#"href="/""#));
    }
}
