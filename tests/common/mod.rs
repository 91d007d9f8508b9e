//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;

use rebuttal_graph::analysis::AnalysisService;
use rebuttal_graph::config::{Config, ProviderConfig, RequestConfig};
use rebuttal_graph::provider::ProviderClient;
use rebuttal_graph::server::{AppState, SharedState};

pub const SCENARIO_INPUT: &str = "我吃的盐比你吃的饭还多,听我的准没错";

/// Config pointing the provider at `base_url`.
pub fn test_config(base_url: &str, api_key: Option<&str>) -> Config {
    let mut config = Config::default();
    config.provider = ProviderConfig {
        api_key: api_key.map(str::to_string),
        base_url: base_url.to_string(),
        model: "gpt-4o-mini".to_string(),
    };
    config.request = RequestConfig { timeout_ms: 5000 };
    config
}

pub fn test_service(base_url: &str, api_key: Option<&str>) -> AnalysisService {
    let config = test_config(base_url, api_key);
    let client = ProviderClient::new(&config.provider, config.request.clone())
        .expect("Failed to create client");
    AnalysisService::new(client, &config)
}

pub fn test_state(base_url: &str, api_key: Option<&str>) -> SharedState {
    let config = test_config(base_url, api_key);
    Arc::new(AppState::new(config).expect("Failed to create state"))
}

/// Reply for the salt-and-rice scenario.
pub fn scenario_analysis() -> Value {
    json!({
        "sentenceType": "诉诸权威",
        "onePunch": "吃的盐多就能替我做决定？资历不等于正确",
        "logicGraph": {
            "nodes": [
                {"id": "node_1", "type": "claim", "label": "主张", "content": "我吃的盐比你吃的饭还多"},
                {"id": "node_2", "type": "rule", "label": "规则", "content": "经验越多→判断越准"},
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
                    "label": "❷ 对了就得听？", "primaryLabel": "事实变义务",
                    "badge": "❷", "badgeColor": "blue"
                }
            ]
        },
        "criticisms": [
            {
                "edgeId": "edge_1",
                "edgeLabel": "❶ 拿资历压人",
                "attacks": ["吃盐多和这件事有什么关系？"],
                "evidenceRequests": ["你在这类问题上判断对过几次？"],
                "analogies": ["我玩游戏比你久，所以你的工作也得听我的？"]
            },
            {
                "edgeId": "edge_2",
                "edgeLabel": "❷ 对了就得听？",
                "attacks": ["正确和服从是两回事"],
                "evidenceRequests": [],
                "analogies": []
            }
        ],
        "harshRebuttals": ["经验是参考，不是命令。"]
    })
}

/// Chat-completion envelope carrying `content` as the first choice.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 900, "completion_tokens": 600, "total_tokens": 1500}
    })
}

pub fn scenario_completion() -> Value {
    completion(&scenario_analysis().to_string())
}
