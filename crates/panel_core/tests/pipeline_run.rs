use std::sync::Once;

use panel_core::{
    targets, update, ApiFailure, ControlEdit, Effect, FormControl, FormDocument, Height, Msg,
    PanelState, Section, Tier, WORKING_HTML,
};
use panel_protocol::{FieldId, RunResponse, StageKey};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn sample_form() -> FormDocument {
    FormDocument::new(vec![
        FormControl::text("timeout", Section::Fetching, "15000"),
        FormControl::hidden("fetcherKey", Section::Fetching, ""),
        FormControl::text("matches", Section::Mapping, "5"),
    ])
}

fn new_state() -> PanelState {
    PanelState::new(sample_form(), "/pub2tools", "")
}

fn run_response(raw: serde_json::Value) -> RunResponse {
    serde_json::from_value(raw).expect("run response")
}

fn sent_run(effects: &[Effect]) -> (u64, serde_json::Value) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SendRun {
                generation, body, ..
            } => Some((*generation, body.clone())),
            _ => None,
        })
        .expect("a SendRun effect")
}

fn set_field(state: PanelState, field: FieldId, value: &str) -> PanelState {
    let (state, _) = update(
        state,
        Msg::FieldEdited {
            field,
            value: value.to_string(),
        },
    );
    state
}

#[test]
fn extraction_run_sends_params_step_and_non_empty_inputs() {
    init_logging();
    let state = new_state();
    let (state, _) = update(
        state,
        Msg::ParamEdited {
            id: "matches".to_string(),
            edit: ControlEdit::Text("10".to_string()),
        },
    );
    let state = set_field(state, FieldId::PublicationIds, "17478515");
    let state = set_field(state, FieldId::ToolName, "g:Profiler");
    // webpageUrls left empty on purpose.

    let (state, effects) = update(
        state,
        Msg::RunClicked {
            stage: StageKey::Withoutmap,
        },
    );
    assert_eq!(state.run_pending(), Some(StageKey::Withoutmap));
    assert_eq!(
        effects[0],
        Effect::SetRunButtonsEnabled { enabled: false }
    );

    let (_generation, body) = sent_run(&effects);
    assert_eq!(
        body,
        json!({
            "matches": "10",
            "step": "withoutmap",
            "publicationIds": "17478515",
            "name": "g:Profiler"
        })
    );

    // Pre-send clearing: every stage output wiped, mapping output collapsed,
    // own output pending.
    assert!(effects.contains(&Effect::SetHtml {
        target: "map-output".to_string(),
        html: String::new(),
    }));
    assert!(effects.contains(&Effect::SetValue {
        target: targets::RESULTS.to_string(),
        value: String::new(),
    }));
    assert!(effects.contains(&Effect::SetHeight {
        target: targets::MAPPING_OUTPUT.to_string(),
        height: Height::Collapsed,
    }));
    assert!(effects.contains(&Effect::SetOutputTier {
        target: "withoutmap-output".to_string(),
        tier: Some(Tier::Medium),
    }));
    assert!(effects.contains(&Effect::SetHtml {
        target: "withoutmap-output".to_string(),
        html: WORKING_HTML.to_string(),
    }));
}

#[test]
fn map_run_parses_results_editor_into_tool() {
    init_logging();
    let state = new_state();
    let (state, _) = update(
        state,
        Msg::ResultsEdited {
            text: "{\"name\": \"g:Profiler\"}".to_string(),
        },
    );

    let (_state, effects) = update(state, Msg::RunClicked { stage: StageKey::Map });
    let (_generation, body) = sent_run(&effects);
    assert_eq!(
        body,
        json!({ "step": "map", "tool": { "name": "g:Profiler" } })
    );
}

#[test]
fn map_run_with_empty_editor_sends_no_tool() {
    init_logging();
    let (_state, effects) = update(new_state(), Msg::RunClicked { stage: StageKey::Map });
    let (_generation, body) = sent_run(&effects);
    assert_eq!(body, json!({ "step": "map" }));
}

#[test]
fn invalid_results_json_aborts_without_sending() {
    init_logging();
    let state = new_state();
    let (state, _) = update(
        state,
        Msg::ResultsEdited {
            text: "{ not json".to_string(),
        },
    );

    let (state, effects) = update(state, Msg::RunClicked { stage: StageKey::Map });
    assert_eq!(state.run_pending(), None);
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::SendRun { .. })));
    assert_eq!(effects.len(), 3);
    match &effects[0] {
        Effect::SetHtml { target, html } => {
            assert_eq!(target, "map-output");
            assert!(html.starts_with("<span>"));
        }
        other => panic!("unexpected effect {other:?}"),
    }
    assert_eq!(
        effects[1],
        Effect::SetOutputTier {
            target: "map-output".to_string(),
            tier: Some(Tier::Bad),
        }
    );
    assert_eq!(effects[2], Effect::SetRunButtonsEnabled { enabled: true });
}

#[test]
fn all_run_success_strips_server_fields_and_applies_confidence() {
    init_logging();
    let (state, effects) = update(new_state(), Msg::RunClicked { stage: StageKey::All });
    let (generation, _body) = sent_run(&effects);

    let response = run_response(json!({
        "success": true,
        "tool": {
            "name": "g:Profiler",
            "confidence_flag": "medium",
            "function": [{ "operation": [] }],
            "topic": [{ "term": "Gene expression" }]
        },
        "status": { "include": true },
        "time": { "duration": 12.3 }
    }));
    let (state, effects) = update(
        state,
        Msg::RunCompleted {
            stage: StageKey::All,
            generation,
            outcome: Ok(response),
        },
    );

    assert_eq!(state.run_pending(), None);
    // The persisted editor text has function/topic stripped.
    let persisted: serde_json::Value = serde_json::from_str(state.results_json()).unwrap();
    assert_eq!(persisted, json!({ "name": "g:Profiler", "confidence_flag": "medium" }));

    assert!(effects.contains(&Effect::SetInputTier {
        target: targets::RESULTS.to_string(),
        tier: Some(Tier::Medium),
    }));
    // The mapping output shows the full tool, escaped.
    let mapping_html = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SetHtml { target, html } if target == targets::MAPPING_OUTPUT => Some(html),
            _ => None,
        })
        .expect("mapping output html");
    assert!(mapping_html.contains("&quot;function&quot;"));
    assert!(effects.contains(&Effect::SetHeight {
        target: targets::MAPPING_OUTPUT.to_string(),
        height: Height::FitContent,
    }));
    assert!(effects.contains(&Effect::SetHtml {
        target: "all-output".to_string(),
        html: "<span>Took 12.3 seconds</span>".to_string(),
    }));
    assert_eq!(
        effects.last(),
        Some(&Effect::SetRunButtonsEnabled { enabled: true })
    );
}

#[test]
fn withoutmap_success_renders_diagnostics_panel() {
    init_logging();
    let (state, effects) = update(
        new_state(),
        Msg::RunClicked {
            stage: StageKey::Withoutmap,
        },
    );
    let (generation, _body) = sent_run(&effects);

    let response = run_response(json!({
        "success": true,
        "tool": { "name": "mytool", "confidence_flag": "high" },
        "status": {
            "include": false,
            "homepageMissing": true,
            "nameMatch": ["mytool (homepage)", "my_tool (name)"],
            "otherNames": ["my-tool"]
        },
        "time": { "duration": "3" }
    }));
    let (_state, effects) = update(
        state,
        Msg::RunCompleted {
            stage: StageKey::Withoutmap,
            generation,
            outcome: Ok(response),
        },
    );

    let panel = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SetHtml { target, html } if target == targets::RESULTS_OUTPUT => Some(html),
            _ => None,
        })
        .expect("diagnostics html");
    assert_eq!(
        panel,
        "<span>Not a tool!</span><br>\
         <span>Homepage missing!</span><br>\
         <span>Name similar to <a href=\"https://bio.tools/mytool\">mytool</a>, \
         <a href=\"https://bio.tools/my_tool\">my_tool</a></span><br>\
         <span>Correct name could also be \"my-tool\"</span><br>"
    );
    // High confidence colors the results editor good.
    assert!(effects.contains(&Effect::SetInputTier {
        target: targets::RESULTS.to_string(),
        tier: Some(Tier::Good),
    }));
    // A withoutmap run never touches the mapping output beyond the pre-send
    // clear.
    assert!(!effects.contains(&Effect::SetHeight {
        target: targets::MAPPING_OUTPUT.to_string(),
        height: Height::FitContent,
    }));
}

#[test]
fn run_failure_renders_message_and_reenables_buttons() {
    init_logging();
    let (state, effects) = update(new_state(), Msg::RunClicked { stage: StageKey::All });
    let (generation, _body) = sent_run(&effects);

    let response = run_response(json!({
        "success": false,
        "message": "No publications found",
        "time": "2023-05-01T12:00:00Z"
    }));
    let (state, effects) = update(
        state,
        Msg::RunCompleted {
            stage: StageKey::All,
            generation,
            outcome: Ok(response),
        },
    );

    assert_eq!(state.run_pending(), None);
    assert_eq!(
        effects,
        vec![
            Effect::SetOutputTier {
                target: "all-output".to_string(),
                tier: Some(Tier::Bad),
            },
            Effect::SetHtml {
                target: "all-output".to_string(),
                html: "<span>No publications found</span>\
                       <br><span>2023-05-01T12:00:00Z</span>"
                    .to_string(),
            },
            Effect::SetRunButtonsEnabled { enabled: true },
        ]
    );
}

#[test]
fn transport_failure_is_terminal_for_the_run() {
    init_logging();
    let (state, effects) = update(new_state(), Msg::RunClicked { stage: StageKey::Map });
    let (generation, _body) = sent_run(&effects);

    let (state, effects) = update(
        state,
        Msg::RunCompleted {
            stage: StageKey::Map,
            generation,
            outcome: Err(ApiFailure::default()),
        },
    );
    assert_eq!(state.run_pending(), None);
    assert!(effects.contains(&Effect::SetHtml {
        target: "map-output".to_string(),
        html: "<span>Internal Server Error</span>".to_string(),
    }));
}

#[test]
fn stale_run_completion_is_discarded() {
    init_logging();
    let (state, effects) = update(new_state(), Msg::RunClicked { stage: StageKey::Map });
    let (stale, _body) = sent_run(&effects);
    let (state, effects) = update(state, Msg::RunClicked { stage: StageKey::All });
    let (current, _body) = sent_run(&effects);
    assert!(current > stale);

    let response = run_response(json!({ "success": true, "tool": { "name": "t" } }));
    let (state, effects) = update(
        state,
        Msg::RunCompleted {
            stage: StageKey::Map,
            generation: stale,
            outcome: Ok(response),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.run_pending(), Some(StageKey::All));
}
