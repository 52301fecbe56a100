use serde::Serialize;

use crate::classify::{classify, HandledType};
use crate::entity::{flatten_with_depth, MimeEntity};
use crate::types::DispositionKind;

/// One line of a message outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartSummary {
    pub depth: usize,
    pub mimetype: String,
    pub disposition: Option<DispositionKind>,
    pub filename: Option<String>,
    pub charset: Option<String>,
    pub handled: HandledType,
    pub is_attachment: bool,
}

/// Every part the walker would visit, with its classification.
pub fn outline<E: MimeEntity>(message: &E) -> Vec<PartSummary> {
    flatten_with_depth(message, |_| false)
        .into_iter()
        .map(|(depth, part)| {
            let class = classify(part);
            PartSummary {
                depth,
                mimetype: class.content_type.mimetype,
                disposition: class.disposition.kind,
                filename: class.disposition.filename,
                charset: class.content_type.charset,
                handled: class.handled,
                is_attachment: class.is_attachment,
            }
        })
        .collect()
}

/// Indented listing, one part per line. Attachments are starred.
pub fn mime_summary(parts: &[PartSummary]) -> String {
    parts
        .iter()
        .map(|p| {
            let indent = "  ".repeat(p.depth.saturating_sub(1));
            let star = if p.is_attachment { "*" } else { "" };
            let name = p
                .filename
                .as_deref()
                .map(|f| format!(" ({f})"))
                .unwrap_or_default();
            format!("{indent}{}{star}{name}", p.mimetype)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
