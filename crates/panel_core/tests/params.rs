use std::sync::Once;

use panel_core::{
    collect_params, update, ControlEdit, Effect, FormControl, FormDocument, Msg, PanelState,
    ParamScope, ParamValue, Section, SelectOption,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn sample_form() -> FormDocument {
    FormDocument::new(vec![
        FormControl::text("timeout", Section::Fetching, "15000"),
        FormControl::hidden("fetcherKey", Section::Fetching, ""),
        FormControl::text("matches", Section::Mapping, "5"),
        FormControl::checkbox("obsolete", Section::Mapping, true),
        FormControl::multi_select(
            "branches",
            Section::Mapping,
            vec![
                SelectOption::new("topic", true),
                SelectOption::new("operation", false),
                SelectOption::new("data", false),
            ],
        ),
        FormControl::select(
            "jsonType",
            Section::Main,
            vec![
                SelectOption::new("core", true),
                SelectOption::new("full", false),
            ],
        ),
    ])
}

fn edit(state: PanelState, id: &str, edit: ControlEdit) -> PanelState {
    let (state, _effects) = update(
        state,
        Msg::ParamEdited {
            id: id.to_string(),
            edit,
        },
    );
    state
}

#[test]
fn untouched_form_produces_empty_param_set() {
    init_logging();
    let form = sample_form();
    assert!(collect_params(&form, ParamScope::Page).is_empty());
    assert!(collect_params(&form, ParamScope::FetcherCompanion).is_empty());
}

#[test]
fn unchecking_a_default_true_checkbox_is_reported() {
    init_logging();
    let state = PanelState::new(sample_form(), "/pub2tools", "");
    let state = edit(state, "obsolete", ControlEdit::Checked(false));

    let params = collect_params(state.form(), ParamScope::Page);
    assert_eq!(params.len(), 1);
    assert_eq!(params.get("obsolete"), Some(&ParamValue::Flag(false)));
}

#[test]
fn growing_a_multi_select_reports_full_selection_in_option_order() {
    init_logging();
    let state = PanelState::new(sample_form(), "/pub2tools", "");
    // Selection order is data first; option order must win.
    let state = edit(
        state,
        "branches",
        ControlEdit::Selection(vec!["data".to_string(), "topic".to_string()]),
    );

    let params = collect_params(state.form(), ParamScope::Page);
    assert_eq!(
        params.get("branches"),
        Some(&ParamValue::Many(vec![
            "topic".to_string(),
            "data".to_string()
        ]))
    );
}

#[test]
fn single_select_reports_current_scalar_value() {
    init_logging();
    let state = PanelState::new(sample_form(), "/pub2tools", "");
    let state = edit(
        state,
        "jsonType",
        ControlEdit::Selection(vec!["full".to_string()]),
    );

    let params = collect_params(state.form(), ParamScope::Page);
    assert_eq!(
        params.get("jsonType"),
        Some(&ParamValue::Text("full".to_string()))
    );
}

#[test]
fn params_never_contain_default_values() {
    init_logging();
    let state = PanelState::new(sample_form(), "/pub2tools", "");
    let state = edit(state, "timeout", ControlEdit::Text("30000".to_string()));
    // Editing back to the default removes the entry again.
    let state = edit(state, "timeout", ControlEdit::Text("15000".to_string()));

    assert!(collect_params(state.form(), ParamScope::Page).is_empty());
}

#[test]
fn collection_is_idempotent() {
    init_logging();
    let state = PanelState::new(sample_form(), "/pub2tools", "");
    let state = edit(state, "matches", ControlEdit::Text("10".to_string()));

    let first = collect_params(state.form(), ParamScope::Page);
    let second = collect_params(state.form(), ParamScope::Page);
    assert_eq!(first, second);
}

#[test]
fn page_scope_skips_hidden_inputs_but_companion_scope_keeps_them() {
    init_logging();
    let state = PanelState::new(sample_form(), "/pub2tools", "");
    let state = edit(state, "fetcherKey", ControlEdit::Text("abc".to_string()));
    let state = edit(state, "timeout", ControlEdit::Text("30000".to_string()));
    let state = edit(state, "matches", ControlEdit::Text("10".to_string()));

    let page = collect_params(state.form(), ParamScope::Page);
    assert_eq!(page.get("fetcherKey"), None);
    assert!(page.get("timeout").is_some());
    assert!(page.get("matches").is_some());

    // Companion scope: fetcher section only, hidden included.
    let companion = collect_params(state.form(), ParamScope::FetcherCompanion);
    assert_eq!(
        companion.get("fetcherKey"),
        Some(&ParamValue::Text("abc".to_string()))
    );
    assert!(companion.get("timeout").is_some());
    assert_eq!(companion.get("matches"), None);
}

#[test]
fn disabled_group_excludes_control_regardless_of_value() {
    init_logging();
    let state = PanelState::new(sample_form(), "/pub2tools", "");
    let state = edit(state, "timeout", ControlEdit::Text("30000".to_string()));
    let (state, effects) = update(
        state,
        Msg::GroupToggled {
            id: "timeout".to_string(),
            disabled: true,
        },
    );

    assert!(collect_params(state.form(), ParamScope::Page).is_empty());
    assert!(collect_params(state.form(), ParamScope::FetcherCompanion).is_empty());
    // The toggle itself rewrites the URL.
    assert_eq!(
        effects,
        vec![Effect::ReplaceUrl {
            href: "/pub2tools".to_string()
        }]
    );
}

#[test]
fn order_follows_document_traversal() {
    init_logging();
    let state = PanelState::new(sample_form(), "/pub2tools", "");
    let state = edit(state, "matches", ControlEdit::Text("10".to_string()));
    let state = edit(state, "timeout", ControlEdit::Text("30000".to_string()));

    let params = collect_params(state.form(), ParamScope::Page);
    let keys: Vec<&str> = params.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["timeout", "matches"]);
}
