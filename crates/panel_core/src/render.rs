//! HTML fragment builders for check and run results.
//!
//! Every dynamic string goes through [`escape_html`]; the fixed label text
//! is trusted literal markup.

use panel_protocol::{CheckEntry, RunStatus};

use crate::effect::Tier;
use crate::escape::escape_html;

/// Placeholder shown in an output region while its request is in flight.
pub const WORKING_HTML: &str = "<span>Working...</span>";

/// Fallback message when a failure carries no server-supplied text.
pub const GENERIC_ERROR: &str = "Internal Server Error";

/// Secondary tier of one checked entry, derived from its status label.
/// Finalized statuses render unmarked.
pub fn status_tier(status: &str) -> Option<Tier> {
    match status {
        "final" | "totally final" => None,
        "non-final" => Some(Tier::Medium),
        _ => Some(Tier::Bad),
    }
}

/// Tier of the results editor, derived from the tool's confidence flag.
pub fn confidence_tier(flag: Option<&str>) -> Tier {
    match flag {
        Some("high") => Tier::Good,
        Some("medium") => Tier::Medium,
        _ => Tier::Bad,
    }
}

/// Renders the per-item lines of a successful field check.
pub fn check_entries_html(entries: &[CheckEntry]) -> String {
    let mut html = String::new();
    for entry in entries {
        match entry {
            CheckEntry::Annotation { uri, label } => {
                html.push_str(&format!(
                    "<span>{} : {}</span><br>",
                    escape_html(uri),
                    escape_html(label)
                ));
            }
            CheckEntry::Record { id, status } => {
                let class = match status_tier(status) {
                    Some(tier) => format!(" class=\"{}\"", tier.output_class()),
                    None => String::new(),
                };
                let label = if id.is_structured() {
                    format!("[{}]", escape_html(&id.joined()))
                } else {
                    escape_html(&id.joined())
                };
                html.push_str(&format!(
                    "<span{class}>{label} : {}</span><br>",
                    escape_html(status)
                ));
            }
        }
    }
    html
}

/// Renders a failure block: the server message (or the generic fallback)
/// plus an optional timestamp.
pub fn failure_html(message: Option<&str>, time: Option<&str>) -> String {
    let mut html = format!("<span>{}</span>", escape_html(message.unwrap_or(GENERIC_ERROR)));
    if let Some(time) = time {
        html.push_str(&format!("<br><span>{}</span>", escape_html(time)));
    }
    html
}

/// Renders a local JSON parse error for a stage output.
pub fn parse_error_html(error: &str) -> String {
    format!("<span>{}</span>", escape_html(error))
}

/// Renders the elapsed-duration line of a completed run.
pub fn duration_html(duration: &str) -> String {
    format!("<span>Took {} seconds</span>", escape_html(duration))
}

/// Renders the diagnostics panel of an extraction result.
pub fn status_panel_html(status: &RunStatus) -> String {
    let mut html = String::new();
    if !status.include {
        html.push_str("<span>Not a tool!</span><br>");
    }
    if status.homepage_broken {
        html.push_str("<span>Homepage broken!</span><br>");
    }
    if status.homepage_missing {
        html.push_str("<span>Homepage missing!</span><br>");
    }
    html.push_str(&overlap_line("Existing in bio.tools as", &status.existing));
    html.push_str(&overlap_line(
        "Same publications and name as in",
        &status.publication_and_name_existing,
    ));
    html.push_str(&overlap_line(
        "Same name and some publications in common with",
        &status.name_existing_some_publication_different,
    ));
    html.push_str(&overlap_line(
        "Some publications in common but name different from",
        &status.some_publication_existing_name_different,
    ));
    html.push_str(&overlap_line(
        "Same name but publications different in",
        &status.name_existing_publication_different,
    ));
    html.push_str(&overlap_line("Name similar to", &status.name_match));
    if let Some(names) = non_empty(&status.other_names) {
        html.push_str(&format!(
            "<span>Correct name could also be {}</span><br>",
            quoted_list(names)
        ));
    }
    if let Some(extra) = non_empty(&status.tools_extra) {
        html.push_str(&format!(
            "<span>Given publications could contain extra tools: {}</span><br>",
            quoted_list(extra)
        ));
    }
    html
}

/// One bio.tools overlap category: a label followed by comma-joined links.
/// The link target strips an entry's ` (` parenthetical suffix.
fn overlap_line(label: &str, entries: &Option<Vec<String>>) -> String {
    match non_empty(entries) {
        Some(list) => {
            let links = list
                .iter()
                .map(|entry| {
                    let name = escape_html(entry.split(" (").next().unwrap_or(entry));
                    format!("<a href=\"https://bio.tools/{name}\">{name}</a>")
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("<span>{label} {links}</span><br>")
        }
        None => String::new(),
    }
}

fn non_empty(entries: &Option<Vec<String>>) -> Option<&[String]> {
    match entries {
        Some(list) if !list.is_empty() => Some(list.as_slice()),
        _ => None,
    }
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", escape_html(item)))
        .collect::<Vec<_>>()
        .join(", ")
}
