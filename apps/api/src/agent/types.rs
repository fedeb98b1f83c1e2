//! Typed views over the model's structured JSON.
//!
//! Every field carries a serde default: the model omitting a key is a normal
//! condition, handled by defaulting, never by failing the request.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routing {
    #[serde(default = "default_true")]
    pub is_technical: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub confidence: f64,
}

impl Default for Routing {
    fn default() -> Self {
        Self {
            is_technical: true,
            category: None,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepToApply {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    #[serde(default)]
    pub code_language: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// The full structured response shape the completion prompt requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredResponse {
    #[serde(default)]
    pub routing: Routing,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub steps_to_apply: Vec<StepToApply>,
    #[serde(default)]
    pub verification_checklist: Vec<String>,
    #[serde(default)]
    pub requests_for_more_info: Vec<String>,
    #[serde(default)]
    pub solution: Solution,
}

/// Flattened, display-ready projection of a structured response.
/// Built once per request by the shaper and never mutated afterwards,
/// except for stamping `ai_record_id` once the row is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiView {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "default_true")]
    pub is_technical: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub verify: Vec<String>,
    #[serde(default)]
    pub ask_more: Vec<String>,
    #[serde(default)]
    pub code_language: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub ticket_prefill: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_record_id: Option<i64>,
}

impl UiView {
    /// Error passthrough shape: `{status: "error", message}`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            is_technical: true,
            category: None,
            summary: None,
            steps: Vec::new(),
            verify: Vec::new(),
            ask_more: Vec::new(),
            code_language: None,
            code: None,
            ticket_prefill: String::new(),
            ai_record_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_defaults_everything() {
        let parsed: StructuredResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.routing.is_technical, "is_technical defaults to true");
        assert!(parsed.routing.category.is_none());
        assert_eq!(parsed.summary, "");
        assert!(parsed.steps_to_apply.is_empty());
        assert!(parsed.verification_checklist.is_empty());
        assert!(parsed.requests_for_more_info.is_empty());
        assert!(parsed.solution.code.is_none());
    }

    #[test]
    fn test_routing_without_is_technical_defaults_true() {
        let parsed: StructuredResponse =
            serde_json::from_str(r#"{"routing": {"category": "coding_bug"}}"#).unwrap();
        assert!(parsed.routing.is_technical);
        assert_eq!(parsed.routing.category.as_deref(), Some("coding_bug"));
    }

    #[test]
    fn test_step_entries_default_text_and_commands() {
        let parsed: StructuredResponse =
            serde_json::from_str(r#"{"steps_to_apply": [{}, {"text": "Restart the IDE"}]}"#)
                .unwrap();
        assert_eq!(parsed.steps_to_apply.len(), 2);
        assert_eq!(parsed.steps_to_apply[0].text, "");
        assert!(parsed.steps_to_apply[0].commands.is_empty());
        assert_eq!(parsed.steps_to_apply[1].text, "Restart the IDE");
    }

    #[test]
    fn test_full_response_deserializes() {
        let json = r#"{
            "routing": {"is_technical": true, "category": "dev_env_tooling", "confidence": 0.9},
            "summary": "You are missing the requests package.",
            "steps_to_apply": [
                {"text": "Install the missing package", "commands": ["pip install requests"]}
            ],
            "verification_checklist": ["import requests succeeds"],
            "requests_for_more_info": [],
            "solution": {"code_language": "bash", "code": "pip install requests"}
        }"#;
        let parsed: StructuredResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.steps_to_apply[0].commands[0], "pip install requests");
        assert_eq!(parsed.solution.code_language.as_deref(), Some("bash"));
    }

    #[test]
    fn test_ui_error_shape() {
        let ui = UiView::error("boom");
        let value = serde_json::to_value(&ui).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "boom");
    }
}
