//! Panel core: pure controller for the tool-extraction form.
//!
//! Diffs form controls against their captured defaults, keeps the shareable
//! page URL in sync, and drives the field-check and pipeline-run state
//! machines. All side effects are returned as [`Effect`] values; no I/O
//! happens here.
mod effect;
mod escape;
mod form;
mod msg;
mod params;
mod render;
mod state;
pub mod targets;
mod update;
mod url;

pub use effect::{Effect, Height, Tier, COLLAPSED_HEIGHT_PX};
pub use escape::escape_html;
pub use form::{FormControl, FormDocument, Section, SelectOption, Widget};
pub use msg::{ApiFailure, ControlEdit, Msg};
pub use params::{collect_params, ParamScope, ParamSet, ParamValue};
pub use render::{
    check_entries_html, confidence_tier, duration_html, failure_html, status_panel_html,
    status_tier, GENERIC_ERROR, WORKING_HTML,
};
pub use state::{FieldPhase, FieldState, PanelState};
pub use update::update;
pub use url::page_href;
