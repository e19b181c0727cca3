use serde::Deserialize;
use serde_json::Value;

/// Identifier attached to one checked entry.
///
/// The server sometimes sends a bare string and sometimes a structured
/// publication id; the shape is resolved here, once, at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Ids {
        #[serde(default)]
        pmid: Option<String>,
        #[serde(default)]
        pmcid: Option<String>,
        #[serde(default)]
        doi: Option<String>,
    },
    Scalar(String),
}

impl Identifier {
    /// Non-empty id parts joined with `", "`; the scalar form as-is.
    pub fn joined(&self) -> String {
        match self {
            Identifier::Scalar(value) => value.clone(),
            Identifier::Ids { pmid, pmcid, doi } => [pmid, pmcid, doi]
                .into_iter()
                .filter_map(|part| part.as_deref())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Identifier::Ids { .. })
    }
}

/// One item of a field-check payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CheckEntry {
    /// Annotation lookup result: a concept URI and its label.
    Annotation { uri: String, label: String },
    /// Everything else: an identifier and its resolution status.
    Record { id: Identifier, status: String },
}

/// Response of a per-field check endpoint.
///
/// The payload proper sits under a key equal to the checked field's id and
/// maps each recognized input item to a [`CheckEntry`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(flatten)]
    payload: serde_json::Map<String, Value>,
}

impl CheckResponse {
    /// Entries reported for `field_id`, in server emission order.
    ///
    /// Items that do not decode as a [`CheckEntry`] are skipped; the server
    /// never mixes shapes within one response.
    pub fn entries(&self, field_id: &str) -> Vec<CheckEntry> {
        match self.payload.get(field_id).and_then(Value::as_object) {
            Some(items) => items
                .values()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            None => Vec::new(),
        }
    }
}
