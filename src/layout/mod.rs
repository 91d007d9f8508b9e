//! Node placement for the argument diagram.
//!
//! Either every node carries a coordinate and those are used verbatim, or the
//! whole graph is placed on a grid of at most three columns.

use std::collections::HashMap;
use tracing::debug;

use crate::analysis::{LogicEdge, LogicGraph, Position};

pub const NODE_WIDTH: f64 = 160.0;
pub const NODE_HEIGHT: f64 = 80.0;

pub const GRID_ORIGIN_X: f64 = 80.0;
pub const GRID_ORIGIN_Y: f64 = 60.0;
pub const COLUMN_SPACING: f64 = 280.0;
pub const ROW_SPACING: f64 = 200.0;
pub const MAX_COLUMNS: usize = 3;

/// Offset from an edge midpoint to the top-left of its label box.
pub const LABEL_OFFSET_X: f64 = 40.0;
pub const LABEL_OFFSET_Y: f64 = 20.0;

/// Room left right of and below the last node.
pub const CANVAS_MARGIN_X: f64 = 40.0;
pub const CANVAS_MARGIN_Y: f64 = 20.0;

/// Where the coordinates of a layout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStrategy {
    Explicit,
    Grid,
}

/// Straight segment between two node box centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Position,
    pub to: Position,
}

/// Node id to top-left coordinate, in graph node order.
#[derive(Debug, Clone)]
pub struct NodeLayout {
    order: Vec<String>,
    positions: HashMap<String, Position>,
    strategy: LayoutStrategy,
}

impl NodeLayout {
    pub fn get(&self, node_id: &str) -> Option<Position> {
        self.positions.get(node_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.positions.get(id).map(|pos| (id.as_str(), *pos)))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    /// Bounding canvas: max over nodes of the box's far corner plus margin.
    pub fn canvas_size(&self) -> (f64, f64) {
        self.positions.values().fold((0.0, 0.0), |(w, h), pos| {
            (
                f64::max(w, pos.x + NODE_WIDTH + CANVAS_MARGIN_X),
                f64::max(h, pos.y + NODE_HEIGHT + CANVAS_MARGIN_Y),
            )
        })
    }

    /// Top-left of the clickable label for `edge`.
    ///
    /// `None` when either endpoint has no coordinate.
    pub fn edge_anchor(&self, edge: &LogicEdge) -> Option<Position> {
        let source = self.get(&edge.source)?;
        let target = self.get(&edge.target)?;
        Some(Position::new(
            ((source.x + target.x) / 2.0 + LABEL_OFFSET_X).round(),
            ((source.y + target.y) / 2.0 + LABEL_OFFSET_Y).round(),
        ))
    }

    /// Line for `edge`, from source box center to target box center.
    pub fn edge_segment(&self, edge: &LogicEdge) -> Option<Segment> {
        let source = self.get(&edge.source)?;
        let target = self.get(&edge.target)?;
        Some(Segment {
            from: box_center(source),
            to: box_center(target),
        })
    }
}

fn box_center(pos: Position) -> Position {
    Position::new(pos.x + NODE_WIDTH / 2.0, pos.y + NODE_HEIGHT / 2.0)
}

/// Assign a coordinate to every node of `graph`.
pub fn layout(graph: &LogicGraph) -> NodeLayout {
    let order: Vec<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
    let explicit = graph.nodes.iter().filter(|n| n.position.is_some()).count();

    if !graph.nodes.is_empty() && explicit == graph.nodes.len() {
        let positions = graph
            .nodes
            .iter()
            .filter_map(|n| n.position.map(|pos| (n.id.clone(), pos)))
            .collect();
        return NodeLayout {
            order,
            positions,
            strategy: LayoutStrategy::Explicit,
        };
    }

    if explicit > 0 {
        debug!(
            explicit,
            nodes = graph.nodes.len(),
            "Partial coordinates ignored, using grid layout"
        );
    }

    let columns = grid_columns(graph.nodes.len());
    let positions = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), grid_position(i, columns)))
        .collect();

    NodeLayout {
        order,
        positions,
        strategy: LayoutStrategy::Grid,
    }
}

/// `min(3, ceil(sqrt(n)))`, and at least one column.
pub fn grid_columns(node_count: usize) -> usize {
    let mut columns = 1;
    while columns * columns < node_count && columns < MAX_COLUMNS {
        columns += 1;
    }
    columns
}

/// Grid slot of the node at sequence index `index`.
pub fn grid_position(index: usize, columns: usize) -> Position {
    let columns = columns.max(1);
    let row = index / columns;
    let col = index % columns;
    Position::new(
        GRID_ORIGIN_X + col as f64 * COLUMN_SPACING,
        GRID_ORIGIN_Y + row as f64 * ROW_SPACING,
    )
}
