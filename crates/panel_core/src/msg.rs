use panel_protocol::{CheckResponse, FieldId, RunResponse, StageKey};

/// User edit to a parameter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEdit {
    Text(String),
    Checked(bool),
    /// New set of selected option values; a single select carries zero or
    /// one entries.
    Selection(Vec<String>),
}

/// Failure of a request before a usable response body existed: transport
/// error, non-JSON body, or undecodable payload.
///
/// Rendered the same way as an application-level failure, with the generic
/// fallback when no message is available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiFailure {
    pub message: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User changed a parameter control.
    ParamEdited { id: String, edit: ControlEdit },
    /// User toggled a parameter group on or off.
    GroupToggled { id: String, disabled: bool },
    /// User finished editing a check/run input field.
    FieldEdited { field: FieldId, value: String },
    /// A field-check request completed.
    CheckCompleted {
        field: FieldId,
        generation: u64,
        outcome: Result<CheckResponse, ApiFailure>,
    },
    /// User edited the results editor by hand.
    ResultsEdited { text: String },
    /// User clicked a pipeline stage button.
    RunClicked { stage: StageKey },
    /// A pipeline-run request completed.
    RunCompleted {
        stage: StageKey,
        generation: u64,
        outcome: Result<RunResponse, ApiFailure>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
