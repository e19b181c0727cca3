use panel_protocol::{
    strip_server_fields, tool_confidence, CheckResponse, FieldId, RunResponse, StageKey, TimeInfo,
};
use serde_json::Value;

use crate::effect::{Effect, Height, Tier};
use crate::escape::escape_html;
use crate::msg::{ApiFailure, Msg};
use crate::params::{collect_params, ParamScope};
use crate::render;
use crate::state::{FieldPhase, PanelState};
use crate::targets;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let effects = match msg {
        Msg::ParamEdited { id, edit } => {
            if state.form_mut().apply_edit(&id, edit) {
                vec![replace_url(&state)]
            } else {
                Vec::new()
            }
        }
        Msg::GroupToggled { id, disabled } => {
            if state.form_mut().set_group_disabled(&id, disabled) {
                vec![replace_url(&state)]
            } else {
                Vec::new()
            }
        }
        Msg::FieldEdited { field, value } => field_edited(&mut state, field, value),
        Msg::CheckCompleted {
            field,
            generation,
            outcome,
        } => check_completed(&mut state, field, generation, outcome),
        Msg::ResultsEdited { text } => {
            state.set_results_json(text);
            Vec::new()
        }
        Msg::RunClicked { stage } => run_clicked(&mut state, stage),
        Msg::RunCompleted {
            stage,
            generation,
            outcome,
        } => run_completed(&mut state, stage, generation, outcome),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn replace_url(state: &PanelState) -> Effect {
    Effect::ReplaceUrl {
        href: state.page_href(),
    }
}

fn field_edited(state: &mut PanelState, field: FieldId, value: String) -> Vec<Effect> {
    state.set_field_value(field, value.clone());
    if field.check_path().is_none() {
        // A run input without a checker; nothing else to do.
        return Vec::new();
    }

    let input_id = field.id().to_string();
    let output_id = field.output_target();

    if value.is_empty() {
        state.set_field_phase(field, FieldPhase::Empty);
        return vec![
            Effect::SetInputTier {
                target: input_id,
                tier: None,
            },
            Effect::SetOutputTier {
                target: output_id.clone(),
                tier: None,
            },
            Effect::SetHtml {
                target: output_id,
                html: String::new(),
            },
        ];
    }

    let generation = state.next_check_generation(field);
    state.set_field_phase(field, FieldPhase::Pending);

    let mut body = if field.sends_companions() {
        collect_params(state.form(), ParamScope::FetcherCompanion).into_map()
    } else {
        serde_json::Map::new()
    };
    body.insert(field.id().to_string(), Value::String(value));

    vec![
        Effect::SetReadOnly {
            target: input_id.clone(),
            read_only: true,
        },
        Effect::SetInputTier {
            target: input_id,
            tier: Some(Tier::Medium),
        },
        Effect::SetOutputTier {
            target: output_id.clone(),
            tier: Some(Tier::Medium),
        },
        Effect::SetHtml {
            target: output_id,
            html: render::WORKING_HTML.to_string(),
        },
        Effect::SendCheck {
            field,
            generation,
            body: Value::Object(body),
        },
    ]
}

fn check_completed(
    state: &mut PanelState,
    field: FieldId,
    generation: u64,
    outcome: Result<CheckResponse, ApiFailure>,
) -> Vec<Effect> {
    if !state.is_current_check(field, generation) {
        // A newer edit superseded this request; drop the stale completion.
        return Vec::new();
    }

    let input_id = field.id().to_string();
    let output_id = field.output_target();

    let mut effects = match outcome {
        Ok(response) if response.success => {
            state.set_field_phase(field, FieldPhase::Good);
            vec![
                Effect::SetInputTier {
                    target: input_id.clone(),
                    tier: Some(Tier::Good),
                },
                Effect::SetOutputTier {
                    target: output_id.clone(),
                    tier: Some(Tier::Good),
                },
                Effect::SetHtml {
                    target: output_id,
                    html: render::check_entries_html(&response.entries(field.id())),
                },
            ]
        }
        Ok(response) => check_failure(
            state,
            field,
            &input_id,
            output_id,
            response.message.as_deref(),
            response.time.as_deref(),
        ),
        Err(failure) => check_failure(
            state,
            field,
            &input_id,
            output_id,
            failure.message.as_deref(),
            failure.time.as_deref(),
        ),
    };

    // The input becomes writable again whatever state was entered.
    effects.push(Effect::SetReadOnly {
        target: input_id,
        read_only: false,
    });
    effects
}

fn check_failure(
    state: &mut PanelState,
    field: FieldId,
    input_id: &str,
    output_id: String,
    message: Option<&str>,
    time: Option<&str>,
) -> Vec<Effect> {
    state.set_field_phase(field, FieldPhase::Bad);
    vec![
        Effect::SetInputTier {
            target: input_id.to_string(),
            tier: Some(Tier::Bad),
        },
        Effect::SetOutputTier {
            target: output_id.clone(),
            tier: Some(Tier::Bad),
        },
        Effect::SetHtml {
            target: output_id,
            html: render::failure_html(message, time),
        },
    ]
}

const RUN_INPUTS: [FieldId; 3] = [FieldId::PublicationIds, FieldId::ToolName, FieldId::WebpageUrls];

fn run_clicked(state: &mut PanelState, stage: StageKey) -> Vec<Effect> {
    let output_id = stage.output_target();

    // Build the request body first: a malformed results editor must abort
    // before anything is cleared or sent.
    let mut body = collect_params(state.form(), ParamScope::Page).into_map();
    body.insert(
        "step".to_string(),
        Value::String(stage.as_str().to_string()),
    );
    if stage.extracts() {
        for field in RUN_INPUTS {
            let value = state.field(field).value();
            if !value.is_empty() {
                body.insert(field.id().to_string(), Value::String(value.to_string()));
            }
        }
    } else if !state.results_json().is_empty() {
        match serde_json::from_str::<Value>(state.results_json()) {
            Ok(tool) => {
                body.insert("tool".to_string(), tool);
            }
            Err(error) => {
                // Fatal to this request only: render inline, keep the
                // buttons usable, send nothing.
                return vec![
                    Effect::SetHtml {
                        target: output_id.clone(),
                        html: render::parse_error_html(&error.to_string()),
                    },
                    Effect::SetOutputTier {
                        target: output_id,
                        tier: Some(Tier::Bad),
                    },
                    Effect::SetRunButtonsEnabled { enabled: true },
                ];
            }
        }
    }

    let generation = state.begin_run(stage);

    let mut effects = vec![Effect::SetRunButtonsEnabled { enabled: false }];
    for other in StageKey::ALL {
        effects.push(Effect::SetHtml {
            target: other.output_target(),
            html: String::new(),
        });
        effects.push(Effect::SetOutputTier {
            target: other.output_target(),
            tier: None,
        });
    }
    if stage.extracts() {
        state.set_results_json(String::new());
        effects.push(Effect::SetValue {
            target: targets::RESULTS.to_string(),
            value: String::new(),
        });
        effects.push(Effect::SetInputTier {
            target: targets::RESULTS.to_string(),
            tier: None,
        });
        effects.push(Effect::SetHtml {
            target: targets::RESULTS_OUTPUT.to_string(),
            html: String::new(),
        });
    }
    effects.push(Effect::SetHtml {
        target: targets::MAPPING_OUTPUT.to_string(),
        html: String::new(),
    });
    effects.push(Effect::SetHeight {
        target: targets::MAPPING_OUTPUT.to_string(),
        height: Height::Collapsed,
    });
    effects.push(Effect::SetOutputTier {
        target: output_id.clone(),
        tier: Some(Tier::Medium),
    });
    effects.push(Effect::SetHtml {
        target: output_id,
        html: render::WORKING_HTML.to_string(),
    });
    effects.push(Effect::SendRun {
        stage,
        generation,
        body: Value::Object(body),
    });
    effects
}

fn run_completed(
    state: &mut PanelState,
    stage: StageKey,
    generation: u64,
    outcome: Result<RunResponse, ApiFailure>,
) -> Vec<Effect> {
    if !state.is_current_run(stage, generation) {
        return Vec::new();
    }
    state.finish_run();

    let output_id = stage.output_target();
    let mut effects = match outcome {
        Ok(response) if response.success => run_success(state, stage, &output_id, &response),
        Ok(response) => {
            let time = response.time.as_ref().and_then(TimeInfo::stamp_text);
            run_failure(&output_id, response.message.as_deref(), time)
        }
        Err(failure) => run_failure(
            &output_id,
            failure.message.as_deref(),
            failure.time.as_deref(),
        ),
    };
    effects.push(Effect::SetRunButtonsEnabled { enabled: true });
    effects
}

fn run_success(
    state: &mut PanelState,
    stage: StageKey,
    output_id: &str,
    response: &RunResponse,
) -> Vec<Effect> {
    let mut effects = vec![Effect::SetOutputTier {
        target: output_id.to_string(),
        tier: Some(Tier::Good),
    }];

    if let Some(tool) = &response.tool {
        if stage.extracts() {
            // An `all` run displays the tool without the server-only
            // mapping fields; a later manual `map` consumes that text.
            let shown = if stage == StageKey::All {
                strip_server_fields(tool)
            } else {
                tool.clone()
            };
            let pretty = serde_json::to_string_pretty(&shown).unwrap_or_default();
            state.set_results_json(pretty.clone());
            effects.push(Effect::SetValue {
                target: targets::RESULTS.to_string(),
                value: pretty,
            });
            effects.push(Effect::SetInputTier {
                target: targets::RESULTS.to_string(),
                tier: Some(render::confidence_tier(tool_confidence(tool))),
            });
            let panel = response
                .status
                .as_ref()
                .map(render::status_panel_html)
                .unwrap_or_default();
            effects.push(Effect::SetHtml {
                target: targets::RESULTS_OUTPUT.to_string(),
                html: panel,
            });
        }
        if stage.maps() {
            // Displayed as text, not injected as markup, so it is escaped.
            let pretty = serde_json::to_string_pretty(tool).unwrap_or_default();
            effects.push(Effect::SetHtml {
                target: targets::MAPPING_OUTPUT.to_string(),
                html: escape_html(&pretty),
            });
            effects.push(Effect::SetHeight {
                target: targets::MAPPING_OUTPUT.to_string(),
                height: Height::FitContent,
            });
        }
    }

    let duration = response
        .time
        .as_ref()
        .and_then(TimeInfo::duration_text)
        .unwrap_or_else(|| "?".to_string());
    effects.push(Effect::SetHtml {
        target: output_id.to_string(),
        html: render::duration_html(&duration),
    });
    effects
}

fn run_failure(output_id: &str, message: Option<&str>, time: Option<&str>) -> Vec<Effect> {
    vec![
        Effect::SetOutputTier {
            target: output_id.to_string(),
            tier: Some(Tier::Bad),
        },
        Effect::SetHtml {
            target: output_id.to_string(),
            html: render::failure_html(message, time),
        },
    ]
}
