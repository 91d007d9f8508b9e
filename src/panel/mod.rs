//! Criticism panel for the selected edge.

use std::fmt::Write;

use crate::analysis::{CriticismCategory, EdgeCriticism};
use crate::markup::escape;

pub const PROMPT_TEXT: &str = "👆 点击上方逻辑图中的边标签查看详细批判";
pub const NOT_FOUND_TEXT: &str = "未找到对应的批判内容";

/// One non-empty rebuttal category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticismSection {
    pub category: CriticismCategory,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticismDetail {
    pub edge_id: String,
    pub edge_label: String,
    pub sections: Vec<CriticismSection>,
}

/// What the panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    /// Nothing selected yet.
    Prompt,
    /// Selected edge has no criticism entry.
    NotFound { edge_id: String },
    Detail(CriticismDetail),
}

/// Resolve the panel state for `selected`.
pub fn render(criticisms: &[EdgeCriticism], selected: Option<&str>) -> PanelView {
    let Some(edge_id) = selected else {
        return PanelView::Prompt;
    };

    match criticisms.iter().find(|c| c.edge_id == edge_id) {
        Some(criticism) => PanelView::Detail(CriticismDetail {
            edge_id: criticism.edge_id.clone(),
            edge_label: criticism.edge_label.clone(),
            sections: criticism
                .non_empty_categories()
                .map(|(category, items)| CriticismSection {
                    category,
                    items: items.to_vec(),
                })
                .collect(),
        }),
        None => PanelView::NotFound {
            edge_id: edge_id.to_string(),
        },
    }
}

impl PanelView {
    pub fn to_html(&self) -> String {
        match self {
            PanelView::Prompt => format!(
                r#"<div class="panel panel-prompt"><p>{}</p></div>"#,
                PROMPT_TEXT
            ),
            PanelView::NotFound { edge_id } => format!(
                r#"<div class="panel panel-empty" data-edge-id="{}"><p>{}</p></div>"#,
                escape(edge_id),
                NOT_FOUND_TEXT
            ),
            PanelView::Detail(detail) => detail.to_html(),
        }
    }
}

impl CriticismDetail {
    fn to_html(&self) -> String {
        let mut html = format!(
            r#"<div class="panel panel-detail" data-edge-id="{}"><h3>{}</h3>"#,
            escape(&self.edge_id),
            escape(&self.edge_label)
        );
        for section in &self.sections {
            let _ = write!(
                html,
                r#"<section class="criticism criticism-{kind}"><h4>{glyph} {title}</h4><ul>"#,
                kind = category_class(section.category),
                glyph = section.category.glyph(),
                title = section.category.title(),
            );
            for item in &section.items {
                let _ = write!(html, "<li>{}</li>", escape(item));
            }
            html.push_str("</ul></section>");
        }
        html.push_str("</div>");
        html
    }
}

fn category_class(category: CriticismCategory) -> &'static str {
    match category {
        CriticismCategory::Attack => "attack",
        CriticismCategory::EvidenceRequest => "evidence",
        CriticismCategory::Analogy => "analogy",
    }
}
