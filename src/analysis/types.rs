//! Argument-graph data model returned by the provider and served to clients.
//!
//! Field names serialize in camelCase to match the JSON contract the model is
//! prompted with.

use serde::{Deserialize, Serialize};

/// Kind of argumentative unit a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Claim,
    Assumption,
    Rule,
    Norm,
    Conclusion,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Claim,
        NodeType::Assumption,
        NodeType::Rule,
        NodeType::Norm,
        NodeType::Conclusion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Claim => "claim",
            NodeType::Assumption => "assumption",
            NodeType::Rule => "rule",
            NodeType::Norm => "norm",
            NodeType::Conclusion => "conclusion",
        }
    }

    /// Chinese type name the prompt asks the model to put in `label`.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeType::Claim => "主张",
            NodeType::Assumption => "假设",
            NodeType::Rule => "规则",
            NodeType::Norm => "规范",
            NodeType::Conclusion => "结论",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claim" => Ok(NodeType::Claim),
            "assumption" => Ok(NodeType::Assumption),
            "rule" => Ok(NodeType::Rule),
            "norm" => Ok(NodeType::Norm),
            "conclusion" => Ok(NodeType::Conclusion),
            _ => Err(format!("Unknown node type: {}", s)),
        }
    }
}

/// Accent color of an edge badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Red,
    Blue,
    Purple,
    Green,
    Orange,
}

impl BadgeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeColor::Red => "red",
            BadgeColor::Blue => "blue",
            BadgeColor::Purple => "purple",
            BadgeColor::Green => "green",
            BadgeColor::Orange => "orange",
        }
    }
}

impl std::fmt::Display for BadgeColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BadgeColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(BadgeColor::Red),
            "blue" => Ok(BadgeColor::Blue),
            "purple" => Ok(BadgeColor::Purple),
            "green" => Ok(BadgeColor::Green),
            "orange" => Ok(BadgeColor::Orange),
            _ => Err(format!("Unknown badge color: {}", s)),
        }
    }
}

/// Numbered edge marker, one of the ten circled glyphs ❶ to ❿.
///
/// Serialized as the glyph itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Badge {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
}

impl Badge {
    pub const ALL: [Badge; 10] = [
        Badge::One,
        Badge::Two,
        Badge::Three,
        Badge::Four,
        Badge::Five,
        Badge::Six,
        Badge::Seven,
        Badge::Eight,
        Badge::Nine,
        Badge::Ten,
    ];

    pub fn glyph(&self) -> char {
        match self {
            Badge::One => '❶',
            Badge::Two => '❷',
            Badge::Three => '❸',
            Badge::Four => '❹',
            Badge::Five => '❺',
            Badge::Six => '❻',
            Badge::Seven => '❼',
            Badge::Eight => '❽',
            Badge::Nine => '❾',
            Badge::Ten => '❿',
        }
    }

    /// Position in the badge alphabet, 1 through 10.
    pub fn index(&self) -> u8 {
        match self {
            Badge::One => 1,
            Badge::Two => 2,
            Badge::Three => 3,
            Badge::Four => 4,
            Badge::Five => 5,
            Badge::Six => 6,
            Badge::Seven => 7,
            Badge::Eight => 8,
            Badge::Nine => 9,
            Badge::Ten => 10,
        }
    }

    pub fn from_index(index: u8) -> Option<Badge> {
        let slot = usize::from(index).checked_sub(1)?;
        Badge::ALL.get(slot).copied()
    }

    pub fn from_glyph(glyph: char) -> Option<Badge> {
        Badge::ALL.into_iter().find(|badge| badge.glyph() == glyph)
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl std::str::FromStr for Badge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(glyph), None) => {
                Badge::from_glyph(glyph).ok_or_else(|| format!("Unknown badge: {}", s))
            }
            _ => Err(format!("Badge must be a single glyph: {}", s)),
        }
    }
}

impl TryFrom<String> for Badge {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Badge> for String {
    fn from(badge: Badge) -> Self {
        badge.glyph().to_string()
    }
}

/// Canvas coordinate in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One claim, assumption, rule, norm or conclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Directed inference step between two nodes, annotated with the fallacy it
/// embodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub primary_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_note: Option<String>,
    pub badge: Badge,
    pub badge_color: BadgeColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicGraph {
    pub nodes: Vec<LogicNode>,
    pub edges: Vec<LogicEdge>,
}

impl LogicGraph {
    pub fn node(&self, id: &str) -> Option<&LogicNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&LogicEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }
}

/// Rebuttal category shown for an edge, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriticismCategory {
    Attack,
    EvidenceRequest,
    Analogy,
}

impl CriticismCategory {
    pub const ALL: [CriticismCategory; 3] = [
        CriticismCategory::Attack,
        CriticismCategory::EvidenceRequest,
        CriticismCategory::Analogy,
    ];

    pub fn glyph(&self) -> &'static str {
        match self {
            CriticismCategory::Attack => "❌",
            CriticismCategory::EvidenceRequest => "📎",
            CriticismCategory::Analogy => "🪞",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CriticismCategory::Attack => "攻击",
            CriticismCategory::EvidenceRequest => "要证据",
            CriticismCategory::Analogy => "同构类比",
        }
    }
}

/// Attacks, evidence requests and analogies aimed at one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeCriticism {
    pub edge_id: String,
    pub edge_label: String,
    pub attacks: Vec<String>,
    pub evidence_requests: Vec<String>,
    pub analogies: Vec<String>,
}

impl EdgeCriticism {
    pub fn items(&self, category: CriticismCategory) -> &[String] {
        match category {
            CriticismCategory::Attack => &self.attacks,
            CriticismCategory::EvidenceRequest => &self.evidence_requests,
            CriticismCategory::Analogy => &self.analogies,
        }
    }

    /// Categories in display order, skipping empty ones.
    pub fn non_empty_categories(
        &self,
    ) -> impl Iterator<Item = (CriticismCategory, &[String])> + '_ {
        CriticismCategory::ALL
            .into_iter()
            .map(move |category| (category, self.items(category)))
            .filter(|(_, items)| !items.is_empty())
    }
}

/// Complete result of analysing one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub sentence_type: String,
    pub one_punch: String,
    pub logic_graph: LogicGraph,
    pub criticisms: Vec<EdgeCriticism>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harsh_rebuttals: Option<Vec<String>>,
}

impl AnalysisResult {
    pub fn criticism_for(&self, edge_id: &str) -> Option<&EdgeCriticism> {
        self.criticisms.iter().find(|c| c.edge_id == edge_id)
    }
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub input: String,
}

/// Error body returned by the HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
