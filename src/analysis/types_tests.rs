//! Unit tests for the analysis data model.

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

// Enum tests
#[test]
fn test_node_type_serde_names() {
    for node_type in NodeType::ALL {
        let value = serde_json::to_value(node_type).unwrap();
        assert_eq!(value, json!(node_type.as_str()));
        assert_eq!(node_type.as_str().parse::<NodeType>().unwrap(), node_type);
    }
    assert!("premise".parse::<NodeType>().is_err());
}

#[test]
fn test_node_type_display_names() {
    assert_eq!(NodeType::Claim.display_name(), "主张");
    assert_eq!(NodeType::Conclusion.display_name(), "结论");
}

#[test]
fn test_badge_color_rejects_unknown() {
    assert_eq!("purple".parse::<BadgeColor>().unwrap(), BadgeColor::Purple);
    assert!("Purple".parse::<BadgeColor>().is_err());
    assert!("yellow".parse::<BadgeColor>().is_err());
}

// Badge tests
#[test]
fn test_badge_index_bijection() {
    for (slot, badge) in Badge::ALL.into_iter().enumerate() {
        let index = u8::try_from(slot + 1).unwrap();
        assert_eq!(badge.index(), index);
        assert_eq!(Badge::from_index(index), Some(badge));
        assert_eq!(Badge::from_glyph(badge.glyph()), Some(badge));
    }
    assert_eq!(Badge::from_index(0), None);
    assert_eq!(Badge::from_index(11), None);
}

#[test]
fn test_badge_parse_requires_single_glyph() {
    assert_eq!("❸".parse::<Badge>().unwrap(), Badge::Three);
    assert!("❸❹".parse::<Badge>().is_err());
    assert!("3".parse::<Badge>().is_err());
    assert!("".parse::<Badge>().is_err());
    assert!("①".parse::<Badge>().is_err());
}

#[test]
fn test_badge_serializes_as_glyph() {
    assert_eq!(serde_json::to_value(Badge::Ten).unwrap(), json!("❿"));
    let badge: Badge = serde_json::from_value(json!("❶")).unwrap();
    assert_eq!(badge, Badge::One);
    assert!(serde_json::from_value::<Badge>(json!("x")).is_err());
}

// Struct serde tests
#[test]
fn test_edge_field_names_are_camel_case() {
    let edge = LogicEdge {
        id: "edge_1".to_string(),
        source: "node_1".to_string(),
        target: "node_2".to_string(),
        label: "❶ 拿资历压人".to_string(),
        primary_label: "资历当论据".to_string(),
        secondary_note: None,
        badge: Badge::One,
        badge_color: BadgeColor::Red,
    };

    let value = serde_json::to_value(&edge).unwrap();
    assert_eq!(value["primaryLabel"], "资历当论据");
    assert_eq!(value["badgeColor"], "red");
    assert_eq!(value["badge"], "❶");
    assert!(value.get("secondaryNote").is_none());
}

#[test]
fn test_node_type_field_renamed() {
    let node: LogicNode = serde_json::from_value(json!({
        "id": "node_1",
        "type": "norm",
        "label": "规范",
        "content": "孝顺就是听话",
        "position": {"x": 10.0, "y": 20.0}
    }))
    .unwrap();

    assert_eq!(node.node_type, NodeType::Norm);
    assert_eq!(node.position, Some(Position::new(10.0, 20.0)));
}

// Criticism tests
fn criticism(attacks: &[&str], evidence: &[&str], analogies: &[&str]) -> EdgeCriticism {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
    EdgeCriticism {
        edge_id: "edge_1".to_string(),
        edge_label: "❶ 拿资历压人".to_string(),
        attacks: owned(attacks),
        evidence_requests: owned(evidence),
        analogies: owned(analogies),
    }
}

#[test]
fn test_non_empty_categories_keeps_display_order() {
    let c = criticism(&["A"], &[], &["C1", "C2"]);
    let categories: Vec<_> = c
        .non_empty_categories()
        .map(|(category, items)| (category, items.len()))
        .collect();

    assert_eq!(
        categories,
        vec![(CriticismCategory::Attack, 1), (CriticismCategory::Analogy, 2)]
    );
}

#[test]
fn test_category_glyphs() {
    assert_eq!(CriticismCategory::Attack.glyph(), "❌");
    assert_eq!(CriticismCategory::EvidenceRequest.glyph(), "📎");
    assert_eq!(CriticismCategory::Analogy.glyph(), "🪞");
    assert_eq!(CriticismCategory::EvidenceRequest.title(), "要证据");
}

#[test]
fn test_criticism_for_lookup() {
    let result = AnalysisResult {
        sentence_type: "诉诸权威".to_string(),
        one_punch: "X".to_string(),
        logic_graph: LogicGraph {
            nodes: vec![],
            edges: vec![],
        },
        criticisms: vec![criticism(&["A"], &[], &[])],
        harsh_rebuttals: None,
    };

    assert!(result.criticism_for("edge_1").is_some());
    assert!(result.criticism_for("edge_9").is_none());

    let value = serde_json::to_value(&result).unwrap();
    assert!(value.get("harshRebuttals").is_none());
    assert_eq!(value["onePunch"], "X");
    assert_eq!(value["sentenceType"], "诉诸权威");
}
