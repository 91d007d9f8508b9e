//! Unit tests for schema validation.

use super::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn valid_analysis() -> Value {
    json!({
        "sentenceType": "诉诸权威",
        "onePunch": "资历不等于正确",
        "logicGraph": {
            "nodes": [
                {"id": "node_1", "type": "claim", "label": "主张", "content": "我吃的盐比你吃的饭还多"},
                {"id": "node_2", "type": "rule", "label": "规则", "content": "经验越多判断越准"},
                {"id": "node_3", "type": "conclusion", "label": "结论", "content": "听我的准没错"}
            ],
            "edges": [
                {
                    "id": "edge_1", "source": "node_1", "target": "node_2",
                    "label": "❶ 拿资历压人", "primaryLabel": "资历当论据",
                    "badge": "❶", "badgeColor": "red"
                },
                {
                    "id": "edge_2", "source": "node_2", "target": "node_3",
                    "label": "❷ 强制服从", "primaryLabel": "事实变义务",
                    "secondaryNote": "判断准不等于必须听",
                    "badge": "❷", "badgeColor": "blue"
                }
            ]
        },
        "criticisms": [
            {
                "edgeId": "edge_1",
                "edgeLabel": "❶ 拿资历压人",
                "attacks": ["吃盐多和这件事有什么关系？"],
                "evidenceRequests": ["你判断对过几次？"],
                "analogies": []
            }
        ]
    })
}

fn issues_at(value: &Value, path: &str) -> usize {
    match validate_analysis(value) {
        Ok(_) => 0,
        Err(errors) => errors.issues().iter().filter(|i| i.path == path).count(),
    }
}

// Analysis result tests
#[test]
fn test_valid_analysis_passes() {
    let result = validate_analysis(&valid_analysis()).unwrap();
    assert_eq!(result.logic_graph.nodes.len(), 3);
    assert_eq!(result.logic_graph.edges[1].badge, Badge::Two);
    assert_eq!(
        result.logic_graph.edges[1].secondary_note.as_deref(),
        Some("判断准不等于必须听")
    );
    assert!(result.harsh_rebuttals.is_none());
}

#[test]
fn test_validation_is_idempotent() {
    let example: Value = serde_json::from_str(crate::prompts::EXAMPLE_ANALYSIS).unwrap();

    let mut positioned = valid_analysis();
    for (i, node) in positioned["logicGraph"]["nodes"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .enumerate()
    {
        node["position"] = json!({"x": 80.5 + i as f64 * 280.0, "y": 60});
    }
    positioned["harshRebuttals"] = json!(["经验是参考，不是命令。"]);

    for value in [valid_analysis(), example, positioned] {
        let first = validate_analysis(&value).unwrap();
        let reencoded = serde_json::to_value(&first).unwrap();
        let second = validate_analysis(&reencoded).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_missing_criticisms_reported() {
    let mut value = valid_analysis();
    value.as_object_mut().unwrap().remove("criticisms");

    let errors = validate_analysis(&value).unwrap_err();
    assert!(errors.has_path("criticisms"));
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_reports_every_violation() {
    let mut value = valid_analysis();
    value["onePunch"] = json!("");
    value["logicGraph"]["nodes"][0]["type"] = json!("premise");
    value["logicGraph"]["edges"][0]["badge"] = json!("⓫");
    value["criticisms"][0]["analogies"] = json!(["a", "b", "c", "d"]);

    let errors = validate_analysis(&value).unwrap_err();
    assert!(errors.has_path("onePunch"));
    assert!(errors.has_path("logicGraph.nodes[0].type"));
    assert!(errors.has_path("logicGraph.edges[0].badge"));
    assert!(errors.has_path("criticisms[0].analogies"));
    assert_eq!(errors.len(), 4);
}

#[test]
fn test_non_object_root() {
    let errors = validate_analysis(&json!([1, 2])).unwrap_err();
    assert!(errors.has_path("$"));
}

#[test]
fn test_id_patterns() {
    for bad in ["node_0", "node_01", "node_", "Node_1", "edge_1", "node_1a"] {
        let mut value = valid_analysis();
        value["logicGraph"]["nodes"][2]["id"] = json!(bad);
        assert!(
            issues_at(&value, "logicGraph.nodes[2].id") > 0,
            "{bad} should be rejected"
        );
    }

    let mut value = valid_analysis();
    value["criticisms"][0]["edgeId"] = json!("node_1");
    assert_eq!(issues_at(&value, "criticisms[0].edgeId"), 1);
}

#[test]
fn test_duplicate_ids_rejected() {
    let mut value = valid_analysis();
    value["logicGraph"]["nodes"][2]["id"] = json!("node_1");
    let errors = validate_analysis(&value).unwrap_err();
    assert!(errors.has_path("logicGraph.nodes[2].id"));

    let mut value = valid_analysis();
    value["logicGraph"]["edges"][1]["id"] = json!("edge_1");
    let errors = validate_analysis(&value).unwrap_err();
    assert!(errors.has_path("logicGraph.edges[1].id"));
}

#[test]
fn test_edge_endpoints_must_exist() {
    let mut value = valid_analysis();
    value["logicGraph"]["edges"][0]["target"] = json!("node_7");

    let errors = validate_analysis(&value).unwrap_err();
    assert!(errors.has_path("logicGraph.edges[0].target"));
    assert!(errors.messages().contains("node_7"));
}

#[test]
fn test_dangling_criticism_edge_is_tolerated() {
    let mut value = valid_analysis();
    value["criticisms"][0]["edgeId"] = json!("edge_9");

    let result = validate_analysis(&value).unwrap();
    assert!(result.logic_graph.edge("edge_9").is_none());
}

#[test]
fn test_content_length_counts_characters() {
    let mut value = valid_analysis();
    value["logicGraph"]["nodes"][0]["content"] = json!("字".repeat(MAX_TEXT_CHARS));
    assert!(validate_analysis(&value).is_ok());

    value["logicGraph"]["nodes"][0]["content"] = json!("字".repeat(MAX_TEXT_CHARS + 1));
    assert_eq!(issues_at(&value, "logicGraph.nodes[0].content"), 1);

    value["logicGraph"]["nodes"][0]["content"] = json!("");
    assert_eq!(issues_at(&value, "logicGraph.nodes[0].content"), 1);
}

#[test]
fn test_node_and_edge_counts() {
    let mut value = valid_analysis();
    let nodes: Vec<Value> = (1..=MAX_NODES + 1)
        .map(|i| {
            json!({"id": format!("node_{i}"), "type": "claim", "label": "主张", "content": "x"})
        })
        .collect();
    value["logicGraph"]["nodes"] = json!(nodes);
    assert_eq!(issues_at(&value, "logicGraph.nodes"), 1);

    let mut value = valid_analysis();
    let first = value["logicGraph"]["nodes"][0].clone();
    value["logicGraph"]["nodes"] = json!([first]);
    assert!(issues_at(&value, "logicGraph.nodes") > 0);

    let mut value = valid_analysis();
    value["logicGraph"]["edges"] = json!([]);
    assert_eq!(issues_at(&value, "logicGraph.edges"), 1);

    let mut value = valid_analysis();
    value["criticisms"] = json!([]);
    assert_eq!(issues_at(&value, "criticisms"), 1);
}

#[test]
fn test_criticism_list_limits() {
    let mut value = valid_analysis();
    value["criticisms"][0]["attacks"] = json!(["1", "2", "3", "4", "5", "6"]);
    value["criticisms"][0]["evidenceRequests"] = json!(["1", "2", "3", "4", "5"]);
    let errors = validate_analysis(&value).unwrap_err();
    assert!(errors.has_path("criticisms[0].attacks"));
    assert!(!errors.has_path("criticisms[0].evidenceRequests"));

    let mut value = valid_analysis();
    value["criticisms"][0]["attacks"] = json!(["ok", ""]);
    assert_eq!(issues_at(&value, "criticisms[0].attacks[1]"), 1);
}

#[test]
fn test_badge_color_must_be_known() {
    let mut value = valid_analysis();
    value["logicGraph"]["edges"][0]["badgeColor"] = json!("yellow");
    assert_eq!(issues_at(&value, "logicGraph.edges[0].badgeColor"), 1);
}

// Optional fields
#[test]
fn test_optional_fields_checked_when_present() {
    let mut value = valid_analysis();
    value["logicGraph"]["edges"][0]["secondaryNote"] = Value::Null;
    assert_eq!(issues_at(&value, "logicGraph.edges[0].secondaryNote"), 1);

    let mut value = valid_analysis();
    value["logicGraph"]["nodes"][0]["position"] = Value::Null;
    assert_eq!(issues_at(&value, "logicGraph.nodes[0].position"), 1);

    let mut value = valid_analysis();
    value["logicGraph"]["nodes"][0]["position"] = json!({"x": 10});
    assert_eq!(issues_at(&value, "logicGraph.nodes[0].position.y"), 1);

    let mut value = valid_analysis();
    value["logicGraph"]["nodes"][0]["position"] = json!({"x": 10, "y": 20.5});
    let result = validate_analysis(&value).unwrap();
    assert_eq!(
        result.logic_graph.nodes[0].position,
        Some(Position::new(10.0, 20.5))
    );
}

#[test]
fn test_harsh_rebuttals() {
    let mut value = valid_analysis();
    value["harshRebuttals"] = json!(["经验是参考，不是命令。"]);
    let result = validate_analysis(&value).unwrap();
    assert_eq!(result.harsh_rebuttals.unwrap().len(), 1);

    value["harshRebuttals"] = json!(["a", "b", "c", "d"]);
    assert_eq!(issues_at(&value, "harshRebuttals"), 1);

    value["harshRebuttals"] = json!(["a", ""]);
    assert_eq!(issues_at(&value, "harshRebuttals[1]"), 1);

    value["harshRebuttals"] = Value::Null;
    assert_eq!(issues_at(&value, "harshRebuttals"), 1);
}

// Input tests
#[test]
fn test_validate_input_bounds() {
    assert!(validate_input("听我的准没错").is_ok());
    assert!(validate_input(&"盐".repeat(MAX_INPUT_CHARS)).is_ok());

    let errors = validate_input(&"盐".repeat(MAX_INPUT_CHARS + 1)).unwrap_err();
    assert_eq!(errors.issues()[0].message, "输入不能超过500字");

    let errors = validate_input("").unwrap_err();
    assert_eq!(errors.issues()[0].message, "输入不能为空");

    let errors = validate_input(" \t\n ").unwrap_err();
    assert_eq!(errors.issues()[0].message, "输入不能只包含空格");
}

#[test]
fn test_validate_request_body() {
    let request = validate_request(&json!({"input": "考不上就别玩手机"})).unwrap();
    assert_eq!(request.input, "考不上就别玩手机");

    assert!(validate_request(&json!({})).unwrap_err().has_path("input"));
    assert!(validate_request(&json!({"input": 42})).unwrap_err().has_path("input"));
    assert!(validate_request(&json!("text")).unwrap_err().has_path("$"));
    assert!(validate_request(&json!({"input": "   "})).is_err());
}
