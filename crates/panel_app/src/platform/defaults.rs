//! Built-in parameter form mirroring the served page's argument tabs.

use panel_core::{ControlEdit, FormControl, FormDocument, Section, SelectOption, Widget};

/// The parameter controls with their served defaults, in document order.
pub fn page_form() -> FormDocument {
    FormDocument::new(vec![
        // Main
        FormControl::select(
            "jsonType",
            Section::Main,
            vec![
                SelectOption::new("core", true),
                SelectOption::new("full", false),
            ],
        ),
        // Processing
        FormControl::checkbox("fetching", Section::Processing, true),
        // Pre-processing
        FormControl::checkbox("numbers", Section::PreProcessing, true),
        FormControl::select(
            "stopwords",
            Section::PreProcessing,
            vec![
                SelectOption::new("lucene", true),
                SelectOption::new("mallet", false),
                SelectOption::new("off", false),
            ],
        ),
        // Fetcher args
        FormControl::text("timeout", Section::Fetching, "15000"),
        FormControl::text("retryLimit", Section::Fetching, "3"),
        FormControl::checkbox("javascript", Section::Fetching, false),
        FormControl::hidden("europepmcEmail", Section::Fetching, ""),
        // Mapper args
        FormControl::multi_select(
            "branches",
            Section::Mapping,
            vec![
                SelectOption::new("topic", true),
                SelectOption::new("operation", true),
                SelectOption::new("data", false),
                SelectOption::new("format", false),
            ],
        ),
        FormControl::text("matches", Section::Mapping, "5"),
        FormControl::checkbox("obsolete", Section::Mapping, false),
    ])
}

/// Builds the edit corresponding to a raw `--set` value for a control.
///
/// Checkboxes take `true`/`false`, multi-selects a comma-separated value
/// list, single selects one option value, everything else raw text.
pub fn edit_for(control: &FormControl, raw: &str) -> Option<ControlEdit> {
    match &control.widget {
        Widget::Text { .. } | Widget::Hidden { .. } => Some(ControlEdit::Text(raw.to_string())),
        Widget::Checkbox { .. } => raw.parse::<bool>().ok().map(ControlEdit::Checked),
        Widget::Select { multiple, .. } => {
            let values: Vec<String> = if raw.is_empty() {
                Vec::new()
            } else if *multiple {
                raw.split(',').map(|value| value.trim().to_string()).collect()
            } else {
                vec![raw.to_string()]
            };
            Some(ControlEdit::Selection(values))
        }
    }
}
