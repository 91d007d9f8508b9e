//! Plain-text export of an analysis and clipboard delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::analysis::AnalysisResult;
use crate::error::ClipboardError;

/// Shown to the user when a clipboard write fails.
pub const COPY_FAILED_MESSAGE: &str = "复制失败，请重试";
/// How long a copy success indicator stays on.
pub const FEEDBACK_RESET: Duration = Duration::from_secs(2);

/// Which part of an analysis to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// One-punch rebuttal, sentence type and every criticism
    #[default]
    All,
    /// One-punch rebuttal only
    Core,
}

/// Full text export.
///
/// Categories with no entries produce no lines at all.
pub fn export_all(result: &AnalysisResult) -> String {
    let details: Vec<String> = result
        .criticisms
        .iter()
        .enumerate()
        .map(|(i, criticism)| {
            let mut lines = vec![format!("{}. {}", i + 1, criticism.edge_label)];
            for (category, items) in criticism.non_empty_categories() {
                lines.extend(items.iter().map(|item| format!("{} {}", category.glyph(), item)));
            }
            lines.join("\n")
        })
        .collect();

    format!(
        "【核心反驳】\n{}\n\n【逻辑分析】\n句型：{}\n\n【批判详情】\n{}",
        result.one_punch,
        result.sentence_type,
        details.join("\n\n")
    )
}

/// Core export: the one-punch rebuttal alone.
pub fn export_core(result: &AnalysisResult) -> String {
    result.one_punch.clone()
}

pub fn export(result: &AnalysisResult, scope: ExportScope) -> String {
    match scope {
        ExportScope::All => export_all(result),
        ExportScope::Core => export_core(result),
    }
}

/// Destination for copied text.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard reached through the platform's copy command.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Pick the copy command for the current platform and session.
    pub fn detect() -> Result<Self, ClipboardError> {
        if cfg!(target_os = "macos") {
            return Ok(Self::new("pbcopy", vec![]));
        }
        if cfg!(target_os = "windows") {
            return Ok(Self::new("clip", vec![]));
        }
        if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            return Ok(Self::new("wl-copy", vec![]));
        }
        if std::env::var_os("DISPLAY").is_some() {
            return Ok(Self::new(
                "xclip",
                vec!["-selection".to_string(), "clipboard".to_string()],
            ));
        }
        Err(ClipboardError::Unavailable)
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        debug!(program = %self.program, bytes = text.len(), "Writing to clipboard");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ClipboardError::Unavailable,
                _ => ClipboardError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A command that exits early closes the pipe; its exit status
            // below is the better error.
            if let Err(e) = stdin.write_all(text.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(ClipboardError::CommandFailed {
                program: self.program.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Transient "copied" indicator that switches itself off after a delay.
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    state: Arc<Mutex<Option<(ExportScope, Instant)>>>,
    reset_after: Duration,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new(FEEDBACK_RESET)
    }
}

impl CopyFeedback {
    pub fn new(reset_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
            reset_after,
        }
    }

    pub async fn mark(&self, scope: ExportScope) {
        *self.state.lock().await = Some((scope, Instant::now()));
    }

    /// Scope of the most recent copy, while its indicator is still on.
    pub async fn active(&self) -> Option<ExportScope> {
        let mut state = self.state.lock().await;
        match *state {
            Some((scope, at)) if at.elapsed() < self.reset_after => Some(scope),
            Some(_) => {
                *state = None;
                None
            }
            None => None,
        }
    }
}

/// Copies exports to a clipboard and tracks the success indicator.
pub struct Exporter<C: Clipboard> {
    clipboard: C,
    feedback: CopyFeedback,
}

impl<C: Clipboard> Exporter<C> {
    pub fn new(clipboard: C) -> Self {
        Self {
            clipboard,
            feedback: CopyFeedback::default(),
        }
    }

    pub fn with_feedback(mut self, feedback: CopyFeedback) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn feedback(&self) -> &CopyFeedback {
        &self.feedback
    }

    /// Export `scope` of `result` and copy it.
    ///
    /// Returns the copied text. A failed write is returned to the caller,
    /// which must tell the user with [`COPY_FAILED_MESSAGE`].
    pub async fn copy(
        &self,
        result: &AnalysisResult,
        scope: ExportScope,
    ) -> Result<String, ClipboardError> {
        let text = export(result, scope);
        match self.clipboard.write_text(&text).await {
            Ok(()) => {
                self.feedback.mark(scope).await;
                info!(scope = ?scope, chars = text.chars().count(), "Copied export");
                Ok(text)
            }
            Err(e) => {
                warn!(scope = ?scope, error = %e, "Clipboard write failed");
                Err(e)
            }
        }
    }
}
