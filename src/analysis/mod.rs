//! Argument analysis: data model, schema validation and the provider-backed
//! analysis pipeline.

mod service;
mod types;
mod validation;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

#[cfg(test)]
#[path = "validation_tests.rs"]
mod validation_tests;

pub use service::AnalysisService;
pub use types::*;
pub use validation::{
    validate_analysis, validate_input, validate_request, MAX_ANALOGIES, MAX_ATTACKS,
    MAX_CRITICISMS, MAX_EDGES, MAX_EVIDENCE_REQUESTS, MAX_HARSH_REBUTTALS, MAX_INPUT_CHARS,
    MAX_NODES, MAX_TEXT_CHARS, MIN_CRITICISMS, MIN_EDGES, MIN_NODES,
};
