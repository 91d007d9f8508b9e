//! Schema validation for analysis results and inbound requests.
//!
//! Validation walks the decoded JSON and records every violated constraint
//! with its field path. Only a value with no issues is decoded into the typed
//! model, so the decode step itself cannot fail on shape.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use super::types::{AnalysisResult, AnalyzeRequest, Badge, BadgeColor, NodeType};
use crate::error::{ValidationErrors, ValidationIssue};

/// Longest accepted user input, in characters.
pub const MAX_INPUT_CHARS: usize = 500;
/// Longest node content, one-punch rebuttal or harsh rebuttal, in characters.
pub const MAX_TEXT_CHARS: usize = 200;
pub const MIN_NODES: usize = 2;
pub const MAX_NODES: usize = 10;
pub const MIN_EDGES: usize = 1;
pub const MAX_EDGES: usize = 10;
pub const MIN_CRITICISMS: usize = 1;
pub const MAX_CRITICISMS: usize = 10;
pub const MAX_ATTACKS: usize = 5;
pub const MAX_EVIDENCE_REQUESTS: usize = 5;
pub const MAX_ANALOGIES: usize = 3;
pub const MAX_HARSH_REBUTTALS: usize = 3;

static NODE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^node_[1-9][0-9]*$").expect("node id pattern compiles"));
static EDGE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^edge_[1-9][0-9]*$").expect("edge id pattern compiles"));

/// Validate a decoded provider reply against the analysis contract.
pub fn validate_analysis(value: &Value) -> Result<AnalysisResult, ValidationErrors> {
    let mut checker = Checker::default();
    if let Some(root) = checker.object(value, "$") {
        check_analysis(&mut checker, root);
    }
    checker.finish()?;

    let result: AnalysisResult = serde_json::from_value(value.clone())
        .map_err(|e| ValidationErrors::single("$", e.to_string()))?;
    warn_dangling_criticisms(&result);
    Ok(result)
}

/// Validate the body of an analyze request.
pub fn validate_request(value: &Value) -> Result<AnalyzeRequest, ValidationErrors> {
    let mut checker = Checker::default();
    let Some(root) = checker.object(value, "$") else {
        return Err(checker.into_errors());
    };
    match root.get("input") {
        Some(Value::String(input)) => check_input(&mut checker, input),
        Some(_) => checker.push("input", "输入必须是字符串"),
        None => checker.push("input", "缺少输入内容"),
    }
    checker.finish()?;

    serde_json::from_value(value.clone()).map_err(|e| ValidationErrors::single("$", e.to_string()))
}

/// Validate raw user input: 1 to 500 characters, not whitespace only.
pub fn validate_input(input: &str) -> Result<(), ValidationErrors> {
    let mut checker = Checker::default();
    check_input(&mut checker, input);
    checker.finish()
}

fn check_input(checker: &mut Checker, input: &str) {
    let chars = input.chars().count();
    if chars == 0 {
        checker.push("input", "输入不能为空");
    } else if input.trim().is_empty() {
        checker.push("input", "输入不能只包含空格");
    }
    if chars > MAX_INPUT_CHARS {
        checker.push("input", format!("输入不能超过{}字", MAX_INPUT_CHARS));
    }
}

fn check_analysis(checker: &mut Checker, root: &Map<String, Value>) {
    checker.text(root, "sentenceType", "sentenceType", TextRule::non_empty("句型分类不能为空"));
    checker.text(
        root,
        "onePunch",
        "onePunch",
        TextRule::bounded("核心反驳不能为空", "核心反驳不能超过200字"),
    );

    match root.get("logicGraph") {
        Some(graph) => {
            if let Some(graph) = checker.object(graph, "logicGraph") {
                check_graph(checker, graph);
            }
        }
        None => checker.push("logicGraph", "缺少逻辑图"),
    }

    if let Some(criticisms) = checker.array(
        root,
        "criticisms",
        "criticisms",
        ArrayRule::new(MIN_CRITICISMS, MAX_CRITICISMS, "至少需要1个批判", "批判数不能超过10"),
    ) {
        for (i, criticism) in criticisms.iter().enumerate() {
            let path = format!("criticisms[{}]", i);
            if let Some(criticism) = checker.object(criticism, &path) {
                check_criticism(checker, criticism, &path);
            }
        }
    }

    if root.contains_key("harshRebuttals") {
        if let Some(rebuttals) = checker.array(
            root,
            "harshRebuttals",
            "harshRebuttals",
            ArrayRule::new(0, MAX_HARSH_REBUTTALS, "", "强硬反驳不能超过3个"),
        ) {
            checker.string_items(
                rebuttals,
                "harshRebuttals",
                TextRule::bounded("强硬反驳不能为空", "强硬反驳不能超过200字"),
            );
        }
    }
}

fn check_graph(checker: &mut Checker, graph: &Map<String, Value>) {
    let mut node_ids = HashSet::new();
    if let Some(nodes) = checker.array(
        graph,
        "nodes",
        "logicGraph.nodes",
        ArrayRule::new(MIN_NODES, MAX_NODES, "至少需要2个节点", "节点数不能超过10"),
    ) {
        for (i, node) in nodes.iter().enumerate() {
            let path = format!("logicGraph.nodes[{}]", i);
            let Some(node) = checker.object(node, &path) else {
                continue;
            };
            if let Some(id) = checker.id(node, "id", &path, &NODE_ID, "节点ID必须是node_开头加数字") {
                if !node_ids.insert(id) {
                    checker.push(format!("{}.id", path), format!("节点ID重复: {}", id));
                }
            }
            checker.variant::<NodeType>(node, "type", &path, "节点类型无效");
            checker.text(node, "label", &format!("{}.label", path), TextRule::non_empty("节点标签不能为空"));
            checker.text(
                node,
                "content",
                &format!("{}.content", path),
                TextRule::bounded("节点内容不能为空", "节点内容不能超过200字"),
            );
            if node.contains_key("position") {
                check_position(checker, node, &path);
            }
        }
    }

    let mut edge_ids = HashSet::new();
    if let Some(edges) = checker.array(
        graph,
        "edges",
        "logicGraph.edges",
        ArrayRule::new(MIN_EDGES, MAX_EDGES, "至少需要1条边", "边数不能超过10"),
    ) {
        for (i, edge) in edges.iter().enumerate() {
            let path = format!("logicGraph.edges[{}]", i);
            let Some(edge) = checker.object(edge, &path) else {
                continue;
            };
            if let Some(id) = checker.id(edge, "id", &path, &EDGE_ID, "边ID必须是edge_开头加数字") {
                if !edge_ids.insert(id) {
                    checker.push(format!("{}.id", path), format!("边ID重复: {}", id));
                }
            }
            for (key, message) in [("source", "源节点ID格式错误"), ("target", "目标节点ID格式错误")] {
                if let Some(endpoint) = checker.id(edge, key, &path, &NODE_ID, message) {
                    if !node_ids.contains(endpoint) {
                        checker.push(
                            format!("{}.{}", path, key),
                            format!("引用了不存在的节点: {}", endpoint),
                        );
                    }
                }
            }
            checker.text(edge, "label", &format!("{}.label", path), TextRule::non_empty("边标签不能为空"));
            checker.text(
                edge,
                "primaryLabel",
                &format!("{}.primaryLabel", path),
                TextRule::non_empty("主标签不能为空"),
            );
            if edge.contains_key("secondaryNote") {
                checker.text(
                    edge,
                    "secondaryNote",
                    &format!("{}.secondaryNote", path),
                    TextRule::any(),
                );
            }
            checker.variant::<Badge>(edge, "badge", &path, "徽章必须是❶-❿之一");
            checker.variant::<BadgeColor>(edge, "badgeColor", &path, "徽章颜色无效");
        }
    }
}

fn check_position(checker: &mut Checker, node: &Map<String, Value>, node_path: &str) {
    let path = format!("{}.position", node_path);
    let Some(position) = node.get("position") else {
        return;
    };
    let Some(position) = checker.object(position, &path) else {
        return;
    };
    for axis in ["x", "y"] {
        match position.get(axis) {
            Some(Value::Number(n)) if n.as_f64().is_some() => {}
            _ => checker.push(format!("{}.{}", path, axis), "坐标必须是数字"),
        }
    }
}

fn check_criticism(checker: &mut Checker, criticism: &Map<String, Value>, path: &str) {
    checker.id(criticism, "edgeId", path, &EDGE_ID, "边ID格式错误");
    checker.text(
        criticism,
        "edgeLabel",
        &format!("{}.edgeLabel", path),
        TextRule::non_empty("边标签不能为空"),
    );

    let lists = [
        ("attacks", MAX_ATTACKS, "攻击点不能超过5个"),
        ("evidenceRequests", MAX_EVIDENCE_REQUESTS, "证据请求不能超过5个"),
        ("analogies", MAX_ANALOGIES, "类比不能超过3个"),
    ];
    for (key, max, too_many) in lists {
        let list_path = format!("{}.{}", path, key);
        if let Some(items) = checker.array(criticism, key, &list_path, ArrayRule::new(0, max, "", too_many)) {
            checker.string_items(items, &list_path, TextRule::non_empty("条目不能为空"));
        }
    }
}

fn warn_dangling_criticisms(result: &AnalysisResult) {
    for criticism in &result.criticisms {
        if result.logic_graph.edge(&criticism.edge_id).is_none() {
            warn!(
                edge_id = %criticism.edge_id,
                "Criticism references an edge that is not in the graph"
            );
        }
    }
}

/// Length constraint for a string field, counted in characters.
#[derive(Clone, Copy)]
struct TextRule {
    min: usize,
    max: Option<usize>,
    empty_message: &'static str,
    long_message: &'static str,
}

impl TextRule {
    fn any() -> Self {
        Self {
            min: 0,
            max: None,
            empty_message: "",
            long_message: "",
        }
    }

    fn non_empty(empty_message: &'static str) -> Self {
        Self {
            min: 1,
            max: None,
            empty_message,
            long_message: "",
        }
    }

    fn bounded(empty_message: &'static str, long_message: &'static str) -> Self {
        Self {
            min: 1,
            max: Some(MAX_TEXT_CHARS),
            empty_message,
            long_message,
        }
    }
}

/// Item-count constraint for an array field.
#[derive(Clone, Copy)]
struct ArrayRule {
    min: usize,
    max: usize,
    few_message: &'static str,
    many_message: &'static str,
}

impl ArrayRule {
    fn new(min: usize, max: usize, few_message: &'static str, many_message: &'static str) -> Self {
        Self {
            min,
            max,
            few_message,
            many_message,
        }
    }
}

/// Accumulates issues while walking a JSON document.
#[derive(Default)]
struct Checker {
    issues: Vec<ValidationIssue>,
}

impl Checker {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self.into_errors())
        }
    }

    fn into_errors(&mut self) -> ValidationErrors {
        ValidationErrors::new(std::mem::take(&mut self.issues))
    }

    fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => {
                self.push(path, "必须是对象");
                None
            }
        }
    }

    /// Required string field checked against a length rule.
    fn text<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        key: &str,
        path: &str,
        rule: TextRule,
    ) -> Option<&'a str> {
        match obj.get(key) {
            Some(Value::String(s)) => {
                self.check_length(s, path, rule);
                Some(s.as_str())
            }
            Some(_) => {
                self.push(path, "必须是字符串");
                None
            }
            None => {
                self.push(path, "缺少必填字段");
                None
            }
        }
    }

    fn check_length(&mut self, s: &str, path: &str, rule: TextRule) {
        let chars = s.chars().count();
        if chars < rule.min {
            self.push(path, rule.empty_message);
        }
        if let Some(max) = rule.max {
            if chars > max {
                self.push(path, rule.long_message);
            }
        }
    }

    /// Required string field matching an id pattern.
    fn id<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        key: &str,
        parent: &str,
        pattern: &Regex,
        message: &str,
    ) -> Option<&'a str> {
        let path = format!("{}.{}", parent, key);
        let id = self.text(obj, key, &path, TextRule::any())?;
        if pattern.is_match(id) {
            Some(id)
        } else {
            self.push(path, message);
            None
        }
    }

    /// Required string field that must parse into a closed variant set.
    fn variant<T: std::str::FromStr>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        parent: &str,
        message: &str,
    ) -> Option<T> {
        let path = format!("{}.{}", parent, key);
        let raw = self.text(obj, key, &path, TextRule::any())?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.push(path, message);
                None
            }
        }
    }

    fn array<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        key: &str,
        path: &str,
        rule: ArrayRule,
    ) -> Option<&'a [Value]> {
        match obj.get(key) {
            Some(Value::Array(items)) => {
                if items.len() < rule.min {
                    self.push(path, rule.few_message);
                }
                if items.len() > rule.max {
                    self.push(path, rule.many_message);
                }
                Some(items.as_slice())
            }
            Some(_) => {
                self.push(path, "必须是数组");
                None
            }
            None => {
                self.push(path, "缺少必填字段");
                None
            }
        }
    }

    fn string_items(&mut self, items: &[Value], path: &str, rule: TextRule) {
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            match item {
                Value::String(s) => self.check_length(s, &item_path, rule),
                _ => self.push(item_path, "必须是字符串"),
            }
        }
    }
}
