//! Interactive argument diagram.
//!
//! Holds the selected edge and renders the graph as SVG. Edge labels are
//! links carrying the edge id, so selecting an edge is a plain navigation.

use std::fmt::Write;

use crate::analysis::{BadgeColor, LogicEdge, LogicGraph, LogicNode, NodeType};
use crate::layout::{self, NodeLayout, NODE_HEIGHT, NODE_WIDTH};
use crate::markup::escape;

/// Content lines shown inside a node box.
pub const CONTENT_LINES: usize = 2;
/// Width budget of one content line, in half-width units.
pub const CONTENT_LINE_UNITS: usize = 22;

const EDGE_STROKE: &str = "#6b7280";
const EDGE_STROKE_SELECTED: &str = "#3b82f6";
const LABEL_BORDER: &str = "#e5e7eb";
const LABEL_BORDER_SELECTED: &str = "#3b82f6";
const LABEL_FILL: &str = "#ffffff";
const LABEL_FILL_SELECTED: &str = "#eff6ff";
const LABEL_HEIGHT: f64 = 30.0;
const ELLIPSIS: char = '…';

/// Fill, border and text colors of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePalette {
    pub fill: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

pub fn node_palette(node_type: NodeType) -> NodePalette {
    match node_type {
        NodeType::Claim => NodePalette {
            fill: "#dbeafe",
            border: "#3b82f6",
            text: "#1d4ed8",
        },
        NodeType::Assumption => NodePalette {
            fill: "#fef9c3",
            border: "#eab308",
            text: "#a16207",
        },
        NodeType::Rule => NodePalette {
            fill: "#dcfce7",
            border: "#22c55e",
            text: "#15803d",
        },
        NodeType::Norm => NodePalette {
            fill: "#f3e8ff",
            border: "#a855f7",
            text: "#7e22ce",
        },
        NodeType::Conclusion => NodePalette {
            fill: "#fee2e2",
            border: "#ef4444",
            text: "#b91c1c",
        },
    }
}

/// Gradient stops (light, dark) of a badge.
pub fn badge_gradient(color: BadgeColor) -> (&'static str, &'static str) {
    match color {
        BadgeColor::Red => ("#f87171", "#dc2626"),
        BadgeColor::Blue => ("#60a5fa", "#2563eb"),
        BadgeColor::Purple => ("#c084fc", "#9333ea"),
        BadgeColor::Green => ("#4ade80", "#16a34a"),
        BadgeColor::Orange => ("#fb923c", "#ea580c"),
    }
}

/// Emitted when the selected edge changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    pub previous: Option<String>,
    pub current: String,
}

/// Diagram of one analysis plus the current edge selection.
#[derive(Debug, Clone)]
pub struct DiagramView<'a> {
    graph: &'a LogicGraph,
    layout: NodeLayout,
    selected: Option<String>,
}

impl<'a> DiagramView<'a> {
    pub fn new(graph: &'a LogicGraph) -> Self {
        Self {
            graph,
            layout: layout::layout(graph),
            selected: None,
        }
    }

    /// Start with `edge_id` selected, if it names an edge of the graph.
    pub fn with_selection(mut self, edge_id: Option<&str>) -> Self {
        if let Some(edge_id) = edge_id {
            self.select(edge_id);
        }
        self
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn layout(&self) -> &NodeLayout {
        &self.layout
    }

    /// Select an edge. Returns the change, or `None` when the edge is already
    /// selected or not part of the graph.
    pub fn select(&mut self, edge_id: &str) -> Option<SelectionChanged> {
        if self.selected.as_deref() == Some(edge_id) {
            return None;
        }
        self.graph.edge(edge_id)?;

        let previous = self.selected.replace(edge_id.to_string());
        Some(SelectionChanged {
            previous,
            current: edge_id.to_string(),
        })
    }

    fn is_selected(&self, edge: &LogicEdge) -> bool {
        self.selected.as_deref() == Some(edge.id.as_str())
    }

    /// Render the whole diagram as an inline SVG element.
    pub fn render_svg(&self) -> String {
        let (width, height) = self.layout.canvas_size();
        let mut svg = String::new();

        let _ = write!(
            svg,
            r#"<svg class="diagram" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );
        svg.push_str(&render_defs());

        // Lines first so node boxes and labels paint over them.
        for edge in &self.graph.edges {
            self.render_edge_line(&mut svg, edge);
        }
        for node in &self.graph.nodes {
            self.render_node(&mut svg, node);
        }
        for (index, edge) in self.graph.edges.iter().enumerate() {
            self.render_edge_label(&mut svg, edge, index);
        }

        svg.push_str("</svg>");
        svg
    }

    fn render_edge_line(&self, svg: &mut String, edge: &LogicEdge) {
        let Some(segment) = self.layout.edge_segment(edge) else {
            return;
        };
        let (stroke, width, opacity, marker) = if self.is_selected(edge) {
            (EDGE_STROKE_SELECTED, 4, "1", "arrowhead-selected")
        } else {
            (EDGE_STROKE, 3, "0.7", "arrowhead")
        };

        let _ = write!(
            svg,
            r#"<line class="edge{sel}" data-edge-id="{id}" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{stroke}" stroke-width="{width}" opacity="{opacity}" marker-end="url(#{marker})"/>"#,
            sel = if self.is_selected(edge) { " selected" } else { "" },
            id = escape(&edge.id),
            x1 = segment.from.x,
            y1 = segment.from.y,
            x2 = segment.to.x,
            y2 = segment.to.y,
        );
    }

    fn render_node(&self, svg: &mut String, node: &LogicNode) {
        let Some(pos) = self.layout.get(&node.id) else {
            return;
        };
        let palette = node_palette(node.node_type);
        let center_x = pos.x + NODE_WIDTH / 2.0;

        let _ = write!(
            svg,
            r#"<g class="node node-{kind}" data-node-id="{id}"><title>{full}</title><rect x="{x}" y="{y}" width="{w}" height="{h}" rx="8" fill="{fill}" stroke="{border}" stroke-width="2"/><text x="{cx}" y="{ly}" text-anchor="middle" class="node-label" fill="{text}">{label}</text>"#,
            kind = node.node_type,
            id = escape(&node.id),
            full = escape(&node.content),
            x = pos.x,
            y = pos.y,
            w = NODE_WIDTH,
            h = NODE_HEIGHT,
            fill = palette.fill,
            border = palette.border,
            cx = center_x,
            ly = pos.y + 26.0,
            text = palette.text,
            label = escape(&node.label),
        );

        for (i, line) in clamp_lines(&node.content, CONTENT_LINES, CONTENT_LINE_UNITS)
            .iter()
            .enumerate()
        {
            let _ = write!(
                svg,
                r#"<text x="{cx}" y="{y}" text-anchor="middle" class="node-content">{line}</text>"#,
                cx = center_x,
                y = pos.y + 46.0 + i as f64 * 16.0,
                line = escape(line),
            );
        }
        svg.push_str("</g>");
    }

    fn render_edge_label(&self, svg: &mut String, edge: &LogicEdge, index: usize) {
        let Some(anchor) = self.layout.edge_anchor(edge) else {
            return;
        };
        let selected = self.is_selected(edge);
        let (border, fill) = if selected {
            (LABEL_BORDER_SELECTED, LABEL_FILL_SELECTED)
        } else {
            (LABEL_BORDER, LABEL_FILL)
        };
        let (_, badge_color) = badge_gradient(edge.badge_color);
        let width = (text_units(&edge.primary_label) + 4) as f64 * 7.0 + 16.0;

        let _ = write!(
            svg,
            r#"<a class="edge-label{sel}{pulse}" href="/result?edge={query}" data-edge-id="{id}" style="animation-delay:{delay:.1}s"><title>{title}</title><rect x="{x}" y="{y}" width="{w}" height="{h}" rx="6" fill="{fill}" stroke="{border}" stroke-width="2"/><text x="{tx}" y="{ty}" class="edge-label-text"><tspan class="badge" fill="{badge_color}">{badge}</tspan> {primary}</text></a>"#,
            sel = if selected { " selected" } else { "" },
            pulse = if index < 3 { " pulse" } else { "" },
            query = urlencoding::encode(&edge.id),
            id = escape(&edge.id),
            delay = index as f64 * 0.3,
            title = escape(&edge.label),
            x = anchor.x,
            y = anchor.y,
            w = width,
            h = LABEL_HEIGHT,
            tx = anchor.x + 10.0,
            ty = anchor.y + 20.0,
            badge = edge.badge,
            primary = escape(&edge.primary_label),
        );
    }
}

fn render_defs() -> String {
    let mut defs = String::from("<defs>");
    for (id, fill) in [
        ("arrowhead", EDGE_STROKE),
        ("arrowhead-selected", EDGE_STROKE_SELECTED),
    ] {
        let _ = write!(
            defs,
            r#"<marker id="{id}" markerWidth="12" markerHeight="12" refX="10" refY="4" orient="auto" markerUnits="strokeWidth"><path d="M0,0 L0,8 L10,4 z" fill="{fill}"/></marker>"#
        );
    }
    defs.push_str("</defs>");
    defs
}

/// Display width in half-width units; anything outside ASCII counts double.
pub fn text_units(text: &str) -> usize {
    text.chars().map(char_units).sum()
}

fn char_units(ch: char) -> usize {
    if ch.is_ascii() {
        1
    } else {
        2
    }
}

/// Wrap `text` into at most `max_lines` lines of `units_per_line`, ending the
/// last line with an ellipsis when text is cut off.
pub fn clamp_lines(text: &str, max_lines: usize, units_per_line: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if max_lines == 0 {
        return lines;
    }

    let mut current = String::new();
    let mut used = 0;
    let mut cut = false;
    for ch in text.chars().filter(|c| *c != '\n' && *c != '\r') {
        let units = char_units(ch);
        if used + units > units_per_line && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            used = 0;
            if lines.len() == max_lines {
                cut = true;
                break;
            }
        }
        current.push(ch);
        used += units;
    }

    if !cut {
        if !current.is_empty() {
            lines.push(current);
        }
        return lines;
    }

    if let Some(last) = lines.last_mut() {
        while text_units(last) + char_units(ELLIPSIS) > units_per_line {
            if last.pop().is_none() {
                break;
            }
        }
        last.push(ELLIPSIS);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Badge, Position};

    fn graph() -> LogicGraph {
        let node = |i: usize, node_type: NodeType| LogicNode {
            id: format!("node_{}", i),
            node_type,
            label: node_type.display_name().to_string(),
            content: format!("内容{}", i),
            position: None,
        };
        let edge = |i: usize, source: usize, target: usize, badge: Badge| LogicEdge {
            id: format!("edge_{}", i),
            source: format!("node_{}", source),
            target: format!("node_{}", target),
            label: format!("{} 谬误{}", badge, i),
            primary_label: format!("谬误{}", i),
            secondary_note: None,
            badge,
            badge_color: BadgeColor::Red,
        };
        LogicGraph {
            nodes: vec![
                node(1, NodeType::Claim),
                node(2, NodeType::Rule),
                node(3, NodeType::Conclusion),
            ],
            edges: vec![edge(1, 1, 2, Badge::One), edge(2, 2, 3, Badge::Two)],
        }
    }

    #[test]
    fn test_initially_nothing_selected() {
        let graph = graph();
        let view = DiagramView::new(&graph);
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn test_select_emits_change() {
        let graph = graph();
        let mut view = DiagramView::new(&graph);

        let change = view.select("edge_1").unwrap();
        assert_eq!(change.previous, None);
        assert_eq!(change.current, "edge_1");

        let change = view.select("edge_2").unwrap();
        assert_eq!(change.previous.as_deref(), Some("edge_1"));
        assert_eq!(view.selected(), Some("edge_2"));
    }

    #[test]
    fn test_select_is_idempotent() {
        let graph = graph();
        let mut view = DiagramView::new(&graph);
        view.select("edge_1");
        assert!(view.select("edge_1").is_none());
        assert_eq!(view.selected(), Some("edge_1"));
    }

    #[test]
    fn test_select_unknown_edge_ignored() {
        let graph = graph();
        let mut view = DiagramView::new(&graph).with_selection(Some("edge_1"));
        assert!(view.select("edge_9").is_none());
        assert_eq!(view.selected(), Some("edge_1"));

        let view = DiagramView::new(&graph).with_selection(Some("edge_9"));
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn test_render_marks_selected_edge() {
        let graph = graph();
        let view = DiagramView::new(&graph).with_selection(Some("edge_2"));
        let svg = view.render_svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("url(#arrowhead-selected)").count(), 1);
        assert_eq!(svg.matches("url(#arrowhead)").count(), 1);
        assert!(svg.contains(r#"class="edge selected" data-edge-id="edge_2""#));
        assert!(svg.contains(r#"href="/result?edge=edge_1""#));
        assert!(svg.contains("❷</tspan> 谬误2"));
    }

    #[test]
    fn test_edge_link_encodes_id() {
        let mut graph = graph();
        graph.edges[0].id = "edge 1&x".to_string();
        let svg = DiagramView::new(&graph).render_svg();

        assert!(svg.contains(r#"href="/result?edge=edge%201%26x""#));
        assert!(svg.contains(r#"data-edge-id="edge 1&amp;x""#));
    }

    #[test]
    fn test_render_nodes_use_type_palette() {
        let graph = graph();
        let svg = DiagramView::new(&graph).render_svg();

        assert!(svg.contains(node_palette(NodeType::Claim).fill));
        assert!(svg.contains(node_palette(NodeType::Conclusion).border));
        assert!(svg.contains(">规则</text>"));
        assert!(svg.contains(">内容3</text>"));
    }

    #[test]
    fn test_render_escapes_content() {
        let mut graph = graph();
        graph.nodes[0].content = "<script>alert(1)</script>".to_string();
        let svg = DiagramView::new(&graph).render_svg();
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_does_not_mutate_content() {
        let mut graph = graph();
        let long = "很".repeat(40);
        graph.nodes[0].content = long.clone();
        let _ = DiagramView::new(&graph).render_svg();
        assert_eq!(graph.nodes[0].content, long);
    }

    #[test]
    fn test_explicit_layout_is_used() {
        let mut graph = graph();
        for (i, node) in graph.nodes.iter_mut().enumerate() {
            node.position = Some(Position::new(i as f64 * 10.0, 5.0));
        }
        let view = DiagramView::new(&graph);
        assert_eq!(view.layout().get("node_3"), Some(Position::new(20.0, 5.0)));
    }

    #[test]
    fn test_clamp_lines_short_text() {
        assert_eq!(clamp_lines("听我的", 2, 22), vec!["听我的".to_string()]);
        assert!(clamp_lines("", 2, 22).is_empty());
    }

    #[test]
    fn test_clamp_lines_wraps_and_truncates() {
        let text = "很".repeat(30);
        let lines = clamp_lines(&text, 2, 22);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "很".repeat(11));
        assert!(lines[1].ends_with('…'));
        assert!(text_units(&lines[1]) <= 22);
    }

    #[test]
    fn test_clamp_lines_exact_fit_has_no_ellipsis() {
        let text = "很".repeat(22);
        let lines = clamp_lines(&text, 2, 22);
        assert_eq!(lines, vec!["很".repeat(11), "很".repeat(11)]);
    }

    #[test]
    fn test_text_units() {
        assert_eq!(text_units("ab"), 2);
        assert_eq!(text_units("盐a"), 3);
    }
}
