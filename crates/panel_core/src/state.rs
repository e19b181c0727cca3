use panel_protocol::{FieldId, StageKey};

use crate::form::FormDocument;
use crate::params::{collect_params, ParamScope};
use crate::url;

/// Lifecycle of one check field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPhase {
    /// Value is empty; no request issued, panel cleared.
    #[default]
    Empty,
    /// A check request is in flight.
    Pending,
    /// Last completed check succeeded.
    Good,
    /// Last completed check failed.
    Bad,
}

/// Current value and check state of one input field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    value: String,
    phase: FieldPhase,
    generation: u64,
}

impl FieldState {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn phase(&self) -> FieldPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One slot per field; a fixed struct instead of a map so lookups cannot
/// miss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Fields {
    publication_ids: FieldState,
    tool_name: FieldState,
    webpage_urls: FieldState,
    annotations: FieldState,
}

impl Fields {
    fn get(&self, field: FieldId) -> &FieldState {
        match field {
            FieldId::PublicationIds => &self.publication_ids,
            FieldId::ToolName => &self.tool_name,
            FieldId::WebpageUrls => &self.webpage_urls,
            FieldId::Annotations => &self.annotations,
        }
    }

    fn get_mut(&mut self, field: FieldId) -> &mut FieldState {
        match field {
            FieldId::PublicationIds => &mut self.publication_ids,
            FieldId::ToolName => &mut self.tool_name,
            FieldId::WebpageUrls => &mut self.webpage_urls,
            FieldId::Annotations => &mut self.annotations,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RunState {
    pending: Option<StageKey>,
    generation: u64,
}

/// Complete controller state: the form model, per-field check states and
/// the pipeline-run state.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    form: FormDocument,
    path: String,
    fragment: String,
    fields: Fields,
    results_json: String,
    run: RunState,
}

impl PanelState {
    /// `path` is the page's path component; `fragment` is the fragment
    /// identifier including its leading `#`, or empty.
    pub fn new(form: FormDocument, path: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            form,
            path: path.into(),
            fragment: fragment.into(),
            fields: Fields::default(),
            results_json: String::new(),
            run: RunState::default(),
        }
    }

    pub fn form(&self) -> &FormDocument {
        &self.form
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormDocument {
        &mut self.form
    }

    /// The shareable href for the current non-default params.
    pub fn page_href(&self) -> String {
        let params = collect_params(&self.form, ParamScope::Page);
        url::page_href(&self.path, &params, &self.fragment)
    }

    pub fn field(&self, field: FieldId) -> &FieldState {
        self.fields.get(field)
    }

    pub fn results_json(&self) -> &str {
        &self.results_json
    }

    pub(crate) fn set_results_json(&mut self, text: String) {
        self.results_json = text;
    }

    /// Stage with a run request in flight, if any. Run buttons are disabled
    /// as a group exactly while this is set.
    pub fn run_pending(&self) -> Option<StageKey> {
        self.run.pending
    }

    pub(crate) fn set_field_value(&mut self, field: FieldId, value: String) {
        self.fields.get_mut(field).value = value;
    }

    pub(crate) fn set_field_phase(&mut self, field: FieldId, phase: FieldPhase) {
        self.fields.get_mut(field).phase = phase;
    }

    /// Bumps and returns the field's request generation. A completion is
    /// applied only if it still carries the latest generation.
    pub(crate) fn next_check_generation(&mut self, field: FieldId) -> u64 {
        let state = self.fields.get_mut(field);
        state.generation += 1;
        state.generation
    }

    pub(crate) fn is_current_check(&self, field: FieldId, generation: u64) -> bool {
        self.fields.get(field).generation == generation
    }

    pub(crate) fn begin_run(&mut self, stage: StageKey) -> u64 {
        self.run.pending = Some(stage);
        self.run.generation += 1;
        self.run.generation
    }

    pub(crate) fn is_current_run(&self, stage: StageKey, generation: u64) -> bool {
        self.run.pending == Some(stage) && self.run.generation == generation
    }

    pub(crate) fn finish_run(&mut self) {
        self.run.pending = None;
    }
}
