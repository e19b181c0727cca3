//! Ids of the fixed output regions the controller writes to.

/// Editable text area holding the extracted tool entry as JSON.
pub const RESULTS: &str = "pub2tools-results";
/// Diagnostics panel below the results editor.
pub const RESULTS_OUTPUT: &str = "pub2tools-results-output";
/// Read-only region showing the mapped registry entry.
pub const MAPPING_OUTPUT: &str = "to-biotools-output";
