use serde::Deserialize;
use serde_json::Value;

/// Response of the pipeline endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub time: Option<TimeInfo>,
    /// The extracted/mapped tool entry; kept as raw JSON since its schema is
    /// owned by the registry, not by this client.
    #[serde(default)]
    pub tool: Option<Value>,
    #[serde(default)]
    pub status: Option<RunStatus>,
}

/// The `time` field is `{ duration }` on success and a plain timestamp
/// string on failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimeInfo {
    Elapsed {
        duration: Value,
    },
    Stamp(String),
}

impl TimeInfo {
    /// Elapsed seconds as display text, whether the server sent a number or
    /// a string.
    pub fn duration_text(&self) -> Option<String> {
        match self {
            TimeInfo::Elapsed { duration } => Some(json_text(duration)),
            TimeInfo::Stamp(_) => None,
        }
    }

    pub fn stamp_text(&self) -> Option<&str> {
        match self {
            TimeInfo::Stamp(stamp) => Some(stamp),
            TimeInfo::Elapsed { .. } => None,
        }
    }
}

/// Diagnostic block attached to extraction results: inclusion and homepage
/// flags plus the bio.tools overlap categories.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunStatus {
    pub include: bool,
    pub homepage_broken: bool,
    pub homepage_missing: bool,
    /// Exact existing bio.tools entries.
    pub existing: Option<Vec<String>>,
    /// Same publications and same name.
    pub publication_and_name_existing: Option<Vec<String>>,
    /// Same name, some publications in common.
    pub name_existing_some_publication_different: Option<Vec<String>>,
    /// Some publications in common, name different.
    pub some_publication_existing_name_different: Option<Vec<String>>,
    /// Same name, publications different.
    pub name_existing_publication_different: Option<Vec<String>>,
    /// Fuzzy name match only.
    pub name_match: Option<Vec<String>>,
    pub other_names: Option<Vec<String>>,
    pub tools_extra: Option<Vec<String>>,
}

/// `confidence_flag` of a tool object, if present.
pub fn tool_confidence(tool: &Value) -> Option<&str> {
    tool.get("confidence_flag").and_then(Value::as_str)
}

/// Copy of `tool` with the server-only `function` and `topic` fields
/// removed, as displayed after an `all` run.
pub fn strip_server_fields(tool: &Value) -> Value {
    let mut stripped = tool.clone();
    if let Some(object) = stripped.as_object_mut() {
        object.remove("function");
        object.remove("topic");
    }
    stripped
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn success_time_is_duration() {
        let response: RunResponse = serde_json::from_value(json!({
            "success": true,
            "tool": { "name": "g:Profiler", "confidence_flag": "high" },
            "time": { "duration": 12.3 }
        }))
        .unwrap();
        let time = response.time.unwrap();
        assert_eq!(time.duration_text().as_deref(), Some("12.3"));
        assert_eq!(time.stamp_text(), None);
        assert_eq!(
            tool_confidence(response.tool.as_ref().unwrap()),
            Some("high")
        );
    }

    #[test]
    fn failure_time_is_stamp() {
        let response: RunResponse = serde_json::from_value(json!({
            "success": false,
            "message": "No publications found",
            "time": "2023-05-01T12:00:00Z"
        }))
        .unwrap();
        let time = response.time.unwrap();
        assert_eq!(time.stamp_text(), Some("2023-05-01T12:00:00Z"));
        assert_eq!(time.duration_text(), None);
    }

    #[test]
    fn strip_removes_only_server_fields() {
        let tool = json!({
            "name": "g:Profiler",
            "function": [{ "operation": [] }],
            "topic": [{ "term": "Gene expression" }],
            "homepage": "https://biit.cs.ut.ee/gprofiler/"
        });
        let stripped = strip_server_fields(&tool);
        assert_eq!(
            stripped,
            json!({
                "name": "g:Profiler",
                "homepage": "https://biit.cs.ut.ee/gprofiler/"
            })
        );
        // The original object is untouched.
        assert!(tool.get("function").is_some());
    }

    #[test]
    fn status_tolerates_missing_and_null_lists() {
        let status: RunStatus = serde_json::from_value(json!({
            "include": true,
            "existing": null,
            "nameMatch": ["gprofiler (homepage)"]
        }))
        .unwrap();
        assert!(status.include);
        assert_eq!(status.existing, None);
        assert_eq!(
            status.name_match,
            Some(vec!["gprofiler (homepage)".to_string()])
        );
        assert_eq!(status.other_names, None);
    }
}
