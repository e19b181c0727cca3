//! In-memory stand-in for the page's rendering surface.
//!
//! Records the DOM-facing effects the controller emits so the binary can
//! inspect and print the resulting page state without a browser.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use panel_core::{Effect, Height, Tier, COLLAPSED_HEIGHT_PX};

/// Accumulated page state, keyed by target element id.
#[derive(Debug, Default)]
pub struct PageSurface {
    url: Option<String>,
    html: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
    input_tiers: BTreeMap<String, Option<Tier>>,
    output_tiers: BTreeMap<String, Option<Tier>>,
    read_only: BTreeMap<String, bool>,
    heights: BTreeMap<String, Height>,
    run_buttons_disabled: bool,
}

impl PageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one DOM effect. `Send*` effects are not surface concerns and
    /// are ignored here; the effect runner routes them to the client.
    pub fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::ReplaceUrl { href } => {
                self.url = Some(href.clone());
            }
            Effect::SetHtml { target, html } => {
                self.html.insert(target.clone(), html.clone());
            }
            Effect::SetValue { target, value } => {
                self.values.insert(target.clone(), value.clone());
            }
            Effect::SetReadOnly { target, read_only } => {
                self.read_only.insert(target.clone(), *read_only);
            }
            Effect::SetInputTier { target, tier } => {
                self.input_tiers.insert(target.clone(), *tier);
            }
            Effect::SetOutputTier { target, tier } => {
                self.output_tiers.insert(target.clone(), *tier);
            }
            Effect::SetRunButtonsEnabled { enabled } => {
                self.run_buttons_disabled = !enabled;
            }
            Effect::SetHeight { target, height } => {
                self.heights.insert(target.clone(), *height);
            }
            Effect::SendCheck { .. } | Effect::SendRun { .. } => {}
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn html(&self, target: &str) -> Option<&str> {
        self.html.get(target).map(String::as_str)
    }

    pub fn value(&self, target: &str) -> Option<&str> {
        self.values.get(target).map(String::as_str)
    }

    /// Multi-line text rendering of everything the controller touched.
    pub fn report(&self) -> String {
        let mut out = String::new();
        if let Some(url) = &self.url {
            let _ = writeln!(out, "url: {url}");
        }
        for (target, value) in &self.values {
            let _ = writeln!(out, "value {target}: {value}");
        }
        for (target, html) in &self.html {
            let _ = writeln!(out, "html {target}: {html}");
        }
        for (target, tier) in &self.input_tiers {
            match tier {
                Some(tier) => {
                    let _ = writeln!(out, "class {target}: {}", tier.input_class());
                }
                None => {
                    let _ = writeln!(out, "class {target}: (none)");
                }
            }
        }
        for (target, tier) in &self.output_tiers {
            match tier {
                Some(tier) => {
                    let _ = writeln!(out, "class {target}: {}", tier.output_class());
                }
                None => {
                    let _ = writeln!(out, "class {target}: (none)");
                }
            }
        }
        for (target, read_only) in &self.read_only {
            let _ = writeln!(out, "readonly {target}: {read_only}");
        }
        for (target, height) in &self.heights {
            match height {
                Height::Collapsed => {
                    let _ = writeln!(out, "height {target}: {COLLAPSED_HEIGHT_PX}px");
                }
                Height::FitContent => {
                    let _ = writeln!(out, "height {target}: fit-content");
                }
            }
        }
        if self.run_buttons_disabled {
            let _ = writeln!(out, "run buttons: disabled");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn later_tier_replaces_earlier_one() {
        let mut surface = PageSurface::new();
        surface.apply(&Effect::SetOutputTier {
            target: "pub".to_string(),
            tier: Some(Tier::Medium),
        });
        surface.apply(&Effect::SetOutputTier {
            target: "pub".to_string(),
            tier: Some(Tier::Good),
        });
        assert_eq!(surface.report(), "class pub: output-good\n");
    }

    #[test]
    fn send_effects_leave_the_surface_untouched() {
        let mut surface = PageSurface::new();
        surface.apply(&Effect::SendRun {
            stage: panel_protocol::StageKey::All,
            generation: 1,
            body: serde_json::json!({}),
        });
        assert_eq!(surface.report(), "");
    }
}
