use panel_protocol::{FieldId, StageKey};
use serde_json::Value;

/// Fixed collapsed height of the mapping output region, in pixels.
pub const COLLAPSED_HEIGHT_PX: u32 = 42;

/// Visual tier applied to an input or output region.
///
/// A target holds at most one tier at a time; setting a tier replaces the
/// previous one and `None` clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Good,
    Medium,
    Bad,
}

impl Tier {
    pub fn input_class(&self) -> &'static str {
        match self {
            Tier::Good => "input-good",
            Tier::Medium => "input-medium",
            Tier::Bad => "input-bad",
        }
    }

    pub fn output_class(&self) -> &'static str {
        match self {
            Tier::Good => "output-good",
            Tier::Medium => "output-medium",
            Tier::Bad => "output-bad",
        }
    }
}

/// Height rule for the mapping output region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Height {
    /// Fixed [`COLLAPSED_HEIGHT_PX`] height.
    Collapsed,
    /// Grow to fit the region's current content.
    FitContent,
}

/// Side effect requested by [`update`](crate::update).
///
/// The platform applies DOM effects to its rendering surface and routes the
/// `Send*` effects to the HTTP client; the carried generation comes back
/// with the completion message so stale responses can be discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the current history entry with the recomputed href.
    ReplaceUrl { href: String },
    /// Set the inner HTML of an output region (already escaped).
    SetHtml { target: String, html: String },
    /// Set the value of an input control.
    SetValue { target: String, value: String },
    /// Toggle read-only on an input control.
    SetReadOnly { target: String, read_only: bool },
    /// Set or clear the input tier class of a control.
    SetInputTier { target: String, tier: Option<Tier> },
    /// Set or clear the output tier class of a region.
    SetOutputTier { target: String, tier: Option<Tier> },
    /// Enable or disable every pipeline run button as a group.
    SetRunButtonsEnabled { enabled: bool },
    /// Apply a height rule to the mapping output region.
    SetHeight { target: String, height: Height },
    /// POST `body` to the field's check endpoint.
    SendCheck {
        field: FieldId,
        generation: u64,
        body: Value,
    },
    /// POST `body` to the pipeline endpoint.
    SendRun {
        stage: StageKey,
        generation: u64,
        body: Value,
    },
}
