//! Response Shaper — turns the model's structured JSON into the flattened
//! view the frontend renders.
//!
//! Non-technical complaints hide all technical detail; the UI offers "open a
//! ticket" instead. Technical complaints get each step's commands inlined,
//! and commands the model dumped into `solution.code` are attached to the
//! most plausible step. Commands that match no step land in a trailing
//! catch-all step rather than disappearing.

use crate::agent::commands::extract_commands;
use crate::agent::matcher::best_step_for_command;
use crate::agent::types::{StepToApply, StructuredResponse, UiView};
use crate::agent::AgentResult;

/// Marker text for steps fabricated to hold unmatched commands. The merge
/// step recognizes it (case-insensitively) and renders the commands as a
/// block instead of splicing them into a sentence.
pub const SYNTHETIC_STEP_TEXT: &str = "Run the following commands/code:";

/// Shapes a completion outcome for the UI. Never fails: a failed completion
/// becomes `{status: "error", message}`, and missing or malformed fields in a
/// structured response fall back to their defaults.
pub fn shape_for_ui(result: &AgentResult) -> UiView {
    let raw = match result {
        AgentResult::Failed { message } => return UiView::error(message.clone()),
        AgentResult::Structured(value) => value,
    };

    let parsed: StructuredResponse = serde_json::from_value(raw.clone()).unwrap_or_default();

    let is_technical = parsed.routing.is_technical;
    let category = parsed.routing.category.clone();
    let summary = parsed.summary.clone();
    let verify = parsed.verification_checklist.clone();
    let ask_more = parsed.requests_for_more_info.clone();
    let mut steps_in = parsed.steps_to_apply.clone();
    let code_raw = parsed
        .solution
        .code
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();

    // Fallback pass: attach commands found in solution.code to the most
    // similar step. Step texts are frozen before the loop, so synthetic
    // steps appended here are never match targets themselves.
    if !code_raw.is_empty() {
        let cmds = extract_commands(&code_raw);
        if !cmds.is_empty() {
            let steps_texts: Vec<String> = steps_in.iter().map(|s| s.text.clone()).collect();
            for cmd in cmds {
                match best_step_for_command(&cmd, &steps_texts) {
                    Some(idx) => {
                        if !steps_in[idx].commands.contains(&cmd) {
                            steps_in[idx].commands.push(cmd);
                        }
                    }
                    None => steps_in.push(StepToApply {
                        text: SYNTHETIC_STEP_TEXT.to_string(),
                        commands: vec![cmd],
                    }),
                }
            }
        }
    }

    let steps_out: Vec<String> = steps_in
        .iter()
        .filter(|s| !s.text.trim().is_empty())
        .map(merge_step)
        .collect();

    let ticket_prefill = format!(
        "[AI Routing] type={}; category={}\n[Summary]\n{}\n[Steps]\n{}",
        if is_technical {
            "technical"
        } else {
            "non-technical"
        },
        category.as_deref().filter(|c| !c.is_empty()).unwrap_or("unknown"),
        summary.trim(),
        steps_out
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n"),
    )
    .trim()
    .to_string();

    let mut ui = UiView {
        status: "ok".to_string(),
        message: None,
        is_technical,
        category,
        summary: Some(summary),
        steps: steps_out,
        verify,
        ask_more,
        code_language: parsed.solution.code_language.clone(),
        code: Some(code_raw),
        ticket_prefill,
        ai_record_id: None,
    };

    // Invariant: non-technical complaints surface no technical instructions,
    // even when the producer violated the schema's own rule.
    if !is_technical {
        ui.summary = None;
        ui.steps = Vec::new();
        ui.verify = Vec::new();
        ui.code_language = None;
        ui.code = None;
    }

    ui
}

/// Produces the single display string for a step, inlining its commands.
fn merge_step(step: &StepToApply) -> String {
    let text = step.text.trim();
    let cmds: Vec<&str> = step
        .commands
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if cmds.is_empty() {
        return text.to_string();
    }
    let joined = cmds
        .iter()
        .map(|c| format!("`{c}`"))
        .collect::<Vec<_>>()
        .join("; ");
    if text.to_lowercase().starts_with("run the following commands/code") {
        // Rendered by the UI as a final code block.
        return format!("{}\n{}", SYNTHETIC_STEP_TEXT, cmds.join("\n"));
    }
    if let Some(stripped) = text.strip_suffix('.') {
        return format!("{stripped} by running {joined}.");
    }
    format!("{text} by running {joined}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structured(value: serde_json::Value) -> AgentResult {
        AgentResult::Structured(value)
    }

    #[test]
    fn test_error_passthrough() {
        let result = AgentResult::Failed {
            message: "OpenAI API error: timeout".to_string(),
        };
        let ui = shape_for_ui(&result);
        assert_eq!(ui.status, "error");
        assert_eq!(ui.message.as_deref(), Some("OpenAI API error: timeout"));
        assert!(ui.steps.is_empty());
    }

    #[test]
    fn test_technical_step_commands_inlined() {
        let ui = shape_for_ui(&structured(json!({
            "routing": {"is_technical": true, "category": "dev_env_tooling"},
            "summary": "Missing package.",
            "steps_to_apply": [
                {"text": "Install the missing package", "commands": ["pip install requests"]}
            ]
        })));
        assert_eq!(ui.status, "ok");
        assert_eq!(
            ui.steps,
            vec!["Install the missing package by running `pip install requests`."]
        );
    }

    #[test]
    fn test_trailing_period_replaced_by_command_suffix() {
        let ui = shape_for_ui(&structured(json!({
            "steps_to_apply": [
                {"text": "Install the missing package.", "commands": ["pip install requests"]}
            ]
        })));
        assert_eq!(
            ui.steps,
            vec!["Install the missing package by running `pip install requests`."]
        );
    }

    #[test]
    fn test_step_without_commands_left_unchanged() {
        let ui = shape_for_ui(&structured(json!({
            "steps_to_apply": [{"text": "Restart the IDE.", "commands": []}]
        })));
        assert_eq!(ui.steps, vec!["Restart the IDE."]);
    }

    #[test]
    fn test_multiple_commands_joined_with_semicolons() {
        let ui = shape_for_ui(&structured(json!({
            "steps_to_apply": [
                {"text": "Set up the environment", "commands": ["conda create -n lab", "conda activate lab"]}
            ]
        })));
        assert_eq!(
            ui.steps,
            vec!["Set up the environment by running `conda create -n lab`; `conda activate lab`."]
        );
    }

    #[test]
    fn test_solution_code_command_attached_to_matching_step() {
        let ui = shape_for_ui(&structured(json!({
            "summary": "Missing package.",
            "steps_to_apply": [
                {"text": "Install the missing package", "commands": []},
                {"text": "Import the module and run the script", "commands": []}
            ],
            "solution": {"code_language": "bash", "code": "```bash\npip install requests\n```"}
        })));
        assert_eq!(
            ui.steps[0],
            "Install the missing package by running `pip install requests`."
        );
        assert_eq!(ui.steps[1], "Import the module and run the script");
    }

    #[test]
    fn test_attach_is_idempotent_when_step_already_has_command() {
        let ui = shape_for_ui(&structured(json!({
            "steps_to_apply": [
                {"text": "Install the missing package", "commands": ["pip install requests"]}
            ],
            "solution": {"code": "```bash\npip install requests\n```"}
        })));
        // Not appended twice
        assert_eq!(
            ui.steps,
            vec!["Install the missing package by running `pip install requests`."]
        );
    }

    #[test]
    fn test_unmatched_command_becomes_synthetic_step() {
        let ui = shape_for_ui(&structured(json!({
            "steps_to_apply": [{"text": "Restart the IDE", "commands": []}],
            "solution": {"code": "```bash\ncurl https://example.com/data.csv\n```"}
        })));
        assert_eq!(ui.steps.len(), 2);
        assert_eq!(
            ui.steps[1],
            "Run the following commands/code:\ncurl https://example.com/data.csv"
        );
    }

    #[test]
    fn test_one_synthetic_step_per_unmatched_command() {
        let ui = shape_for_ui(&structured(json!({
            "steps_to_apply": [{"text": "Restart the IDE", "commands": []}],
            "solution": {"code": "```bash\ncurl https://example.com/a.csv\nwget https://example.com/b.csv\n```"}
        })));
        assert_eq!(ui.steps.len(), 3, "unmatched commands are not coalesced");
        assert!(ui.steps[1].starts_with("Run the following commands/code:\n"));
        assert!(ui.steps[2].starts_with("Run the following commands/code:\n"));
    }

    #[test]
    fn test_blank_text_steps_are_dropped() {
        let ui = shape_for_ui(&structured(json!({
            "steps_to_apply": [
                {"text": "  ", "commands": ["pip install requests"]},
                {"text": "Restart the IDE", "commands": []}
            ]
        })));
        assert_eq!(ui.steps, vec!["Restart the IDE"]);
    }

    #[test]
    fn test_non_technical_override_hides_details() {
        let ui = shape_for_ui(&structured(json!({
            "routing": {"is_technical": false, "category": "non_technical"},
            "summary": "The canteen closes early.",
            // Producer violating its own rule: steps on a non-technical complaint
            "steps_to_apply": [{"text": "Escalate to facilities", "commands": []}],
            "verification_checklist": ["canteen hours updated"],
            "solution": {"code_language": "bash", "code": "echo hi"}
        })));
        assert_eq!(ui.status, "ok");
        assert!(!ui.is_technical);
        assert!(ui.summary.is_none());
        assert!(ui.steps.is_empty());
        assert!(ui.verify.is_empty());
        assert!(ui.code.is_none());
        assert!(ui.code_language.is_none());
        // Prefill built before the override is kept for the ticket form.
        assert!(ui.ticket_prefill.contains("type=non-technical"));
    }

    #[test]
    fn test_non_technical_end_to_end_shape() {
        let ui = shape_for_ui(&structured(json!({
            "routing": {"is_technical": false, "category": "non_technical"},
            "summary": "canteen closes early"
        })));
        assert_eq!(ui.status, "ok");
        assert!(!ui.is_technical);
        assert!(ui.steps.is_empty());
        assert!(ui.summary.is_none());
    }

    #[test]
    fn test_ticket_prefill_layout() {
        let ui = shape_for_ui(&structured(json!({
            "routing": {"is_technical": true, "category": "coding_bug"},
            "summary": "Fix the import.",
            "steps_to_apply": [{"text": "Install the missing package", "commands": []}]
        })));
        let prefill = &ui.ticket_prefill;
        assert!(prefill.starts_with("[AI Routing] type=technical; category=coding_bug"));
        assert!(prefill.contains("[Summary]\nFix the import."));
        assert!(prefill.contains("[Steps]\n- Install the missing package"));
    }

    #[test]
    fn test_missing_category_renders_unknown_in_prefill() {
        let ui = shape_for_ui(&structured(json!({"summary": "Something"})));
        assert!(ui.ticket_prefill.contains("category=unknown"));
    }

    #[test]
    fn test_malformed_fields_default_instead_of_failing() {
        // steps_to_apply with the wrong type falls back to the default shape
        let ui = shape_for_ui(&structured(json!({"steps_to_apply": "not a list"})));
        assert_eq!(ui.status, "ok");
        assert!(ui.steps.is_empty());
        assert!(ui.is_technical);
    }
}
