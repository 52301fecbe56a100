use serde::Serialize;

/// The parts of a `Content-Type` header the extractor cares about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentTypeInfo {
    /// Lower-cased `type/subtype`, empty when the header is absent.
    pub mimetype: String,
    pub charset: Option<String>,
    pub format: Option<String>,
    pub delsp: Option<String>,
}

impl ContentTypeInfo {
    /// The top-level media type, e.g. `image` for `image/png`.
    pub fn top_level(&self) -> &str {
        self.mimetype.split('/').next().unwrap_or_default()
    }

    pub fn is_flowed(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("flowed"))
    }

    /// `delsp=yes`; anything else (including absent) means `no`.
    pub fn delsp(&self) -> bool {
        self.delsp
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case("yes"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionKind {
    Inline,
    Attachment,
    Other(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispositionInfo {
    /// `None` when the part carries no `Content-Disposition` header.
    pub kind: Option<DispositionKind>,
    pub filename: Option<String>,
}

impl DispositionInfo {
    pub fn is(&self, kind: &DispositionKind) -> bool {
        self.kind.as_ref() == Some(kind)
    }
}
