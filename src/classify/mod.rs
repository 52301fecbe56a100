//! Per-part classification: content type, disposition, and the attachment verdict.
use mailparse::{parse_content_disposition, parse_content_type, DispositionType};
use serde::Serialize;

use crate::entity::MimeEntity;
use crate::types::{ContentTypeInfo, DispositionInfo, DispositionKind};

/// Content types the walker has a dedicated arm for. Everything else lands
/// in `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandledType {
    Related,
    Alternative,
    PlainText,
    Html,
    /// text/enriched, as sent by Apple Mail.
    Enriched,
    Other,
}

impl HandledType {
    pub fn from_mimetype(mimetype: &str) -> Self {
        match mimetype {
            "multipart/related" => Self::Related,
            "multipart/alternative" => Self::Alternative,
            "text/plain" => Self::PlainText,
            "text/html" => Self::Html,
            "text/enriched" => Self::Enriched,
            _ => Self::Other,
        }
    }

    /// Containers that get extracted as a message of their own.
    pub fn is_summarizing_container(self) -> bool {
        matches!(self, Self::Related | Self::Alternative)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub content_type: ContentTypeInfo,
    pub disposition: DispositionInfo,
    pub handled: HandledType,
    pub is_attachment: bool,
}

pub fn classify<E: MimeEntity>(part: &E) -> Classification {
    let content_type = content_type_info(part);
    let disposition = disposition_info(part);
    let handled = HandledType::from_mimetype(&content_type.mimetype);

    let mut is_attachment = is_attachment_base(&disposition);
    if handled == HandledType::Other {
        is_attachment |= refine_unhandled(&content_type, &disposition);
    }

    Classification {
        content_type,
        disposition,
        handled,
        is_attachment,
    }
}

/// Attachment if so disposed, or if a filename is given at all.
fn is_attachment_base(disposition: &DispositionInfo) -> bool {
    disposition.is(&DispositionKind::Attachment) || disposition.filename.is_some()
}

/// Extra attachment rules for types without a dedicated arm: inline parts
/// count, except forwarded messages, and so do images.
fn refine_unhandled(content_type: &ContentTypeInfo, disposition: &DispositionInfo) -> bool {
    let inline_non_message =
        disposition.is(&DispositionKind::Inline) && content_type.mimetype != "message/rfc822";
    inline_non_message || content_type.top_level() == "image"
}

pub fn content_type_info<E: MimeEntity>(part: &E) -> ContentTypeInfo {
    let Some(raw) = part.header("Content-Type") else {
        return ContentTypeInfo::default();
    };
    let parsed = parse_content_type(&raw);
    let param = |name: &str| {
        parsed
            .params
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    ContentTypeInfo {
        mimetype: parsed.mimetype.trim().to_ascii_lowercase(),
        charset: param("charset"),
        format: param("format"),
        delsp: param("delsp"),
    }
}

pub fn disposition_info<E: MimeEntity>(part: &E) -> DispositionInfo {
    let Some(raw) = part.header("Content-Disposition") else {
        return DispositionInfo::default();
    };
    let parsed = parse_content_disposition(&raw);
    let kind = match parsed.disposition {
        DispositionType::Inline => DispositionKind::Inline,
        DispositionType::Attachment => DispositionKind::Attachment,
        DispositionType::FormData => DispositionKind::Other("form-data".to_string()),
        DispositionType::Extension(ext) => match ext.trim().to_ascii_lowercase().as_str() {
            "inline" => DispositionKind::Inline,
            "attachment" => DispositionKind::Attachment,
            other => DispositionKind::Other(other.to_string()),
        },
    };
    DispositionInfo {
        kind: Some(kind),
        filename: parsed
            .params
            .get("filename")
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty()),
    }
}
