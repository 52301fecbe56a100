//! Entry point: one plain-text body per message.
use serde::Serialize;
use std::mem;

use crate::classify::content_type_info;
use crate::config::ExtractorConfig;
use crate::decode::ContentDecoder;
use crate::entity::MimeEntity;
use crate::sanitize::html_to_text;
use crate::summary::{outline, PartSummary};
use crate::walker::MimeTreeWalker;

const FRAGMENT_SEPARATOR: &str = "\n\n";

/// Picks the body text of a message. Holds no state between calls, so one
/// extractor can serve any number of messages and threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyExtractor {
    config: ExtractorConfig,
}

/// Body plus a description of the parts it came from.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub body: String,
    pub has_attachments: bool,
    pub parts: Vec<PartSummary>,
}

impl BodyExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Plain text wins over HTML, related-container text only stands in
    /// when there is no plain text, and a single-part message falls back to
    /// its own content. Returns an empty string when nothing is usable.
    pub fn extract<E: MimeEntity>(&self, message: &E) -> String {
        let mut buckets = MimeTreeWalker::new(self.config).walk(message);

        if buckets.text.is_empty() && !buckets.alt_text.is_empty() {
            buckets.text = mem::take(&mut buckets.alt_text);
        }

        if !buckets.text.is_empty() {
            return buckets.text.join(FRAGMENT_SEPARATOR);
        }

        if !buckets.html.is_empty() {
            return html_to_text(&buckets.html, self.config.html_mode);
        }

        if !message.is_multipart() {
            let charset = content_type_info(message).charset;
            return ContentDecoder::new(self.config.default_charset)
                .decode(&message.content(), charset.as_deref());
        }

        String::new()
    }

    pub fn extract_report<E: MimeEntity>(&self, message: &E) -> Extraction {
        let parts = outline(message);
        Extraction {
            body: self.extract(message),
            has_attachments: parts.iter().any(|p| p.is_attachment),
            parts,
        }
    }
}

/// [`BodyExtractor::extract`] with default settings.
pub fn extract_body<E: MimeEntity>(message: &E) -> String {
    BodyExtractor::default().extract(message)
}
