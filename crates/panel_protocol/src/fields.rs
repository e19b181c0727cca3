/// Pipeline phase selected by a run request, sent as the `step` body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKey {
    /// Extract tool metadata without mapping it into a registry entry.
    Withoutmap,
    /// Map already-extracted metadata into a registry entry.
    Map,
    /// Run both stages in a single request.
    All,
}

impl StageKey {
    pub const ALL: [StageKey; 3] = [StageKey::Withoutmap, StageKey::Map, StageKey::All];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKey::Withoutmap => "withoutmap",
            StageKey::Map => "map",
            StageKey::All => "all",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == raw)
    }

    /// Id of the output panel under this stage's run button.
    pub fn output_target(&self) -> String {
        format!("{}-output", self.as_str())
    }

    /// Whether this stage runs metadata extraction (fills the results editor).
    pub fn extracts(&self) -> bool {
        matches!(self, StageKey::Withoutmap | StageKey::All)
    }

    /// Whether this stage runs registry mapping (fills the mapping output).
    pub fn maps(&self) -> bool {
        matches!(self, StageKey::Map | StageKey::All)
    }
}

/// The free-standing inputs above the parameter tabs.
///
/// Each knows its control id and, where one exists, the path of its
/// asynchronous check endpoint relative to the server base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// PMID/PMCID/DOI list of the journal article.
    PublicationIds,
    /// Name of the tool or service; no check endpoint.
    ToolName,
    /// Homepage and other link URLs.
    WebpageUrls,
    /// Free-standing annotation lookup; checked without companion params.
    Annotations,
}

impl FieldId {
    pub const ALL: [FieldId; 4] = [
        FieldId::PublicationIds,
        FieldId::ToolName,
        FieldId::WebpageUrls,
        FieldId::Annotations,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            FieldId::PublicationIds => "publicationIds",
            FieldId::ToolName => "name",
            FieldId::WebpageUrls => "webpageUrls",
            FieldId::Annotations => "annotations",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.id() == raw)
    }

    /// Check endpoint path, or `None` for fields that are run inputs only.
    pub fn check_path(&self) -> Option<&'static str> {
        match self {
            FieldId::PublicationIds => Some("api/pub"),
            FieldId::ToolName => None,
            FieldId::WebpageUrls => Some("api/web"),
            FieldId::Annotations => Some("api/annotations"),
        }
    }

    /// Whether a check for this field carries the fetcher companion params.
    pub fn sends_companions(&self) -> bool {
        !matches!(self, FieldId::Annotations)
    }

    /// Id of the output panel next to this field's input.
    pub fn output_target(&self) -> String {
        format!("{}-output", self.id())
    }
}
