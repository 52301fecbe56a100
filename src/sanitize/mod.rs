//! HTML fragments to plain text.
use html2text::from_read;
use htmlescape::decode_html;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::config::HtmlMode;

/// Markup that stands for a line break in mail clients that never send
/// newlines in their HTML (iNotes).
const LINE_BREAK_MARKUP: &[&str] = &["</DIV><DIV>", "<br>", "<br />", "<BR>", "<BR />"];

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->|<[A-Za-z/!?][^>]*>").expect("valid regex"));

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9A-Fa-f]{1,6})|([A-Za-z][A-Za-z0-9]{1,31}));")
        .expect("valid regex")
});

/// Converts HTML fragments to text according to `mode`.
pub fn html_to_text(fragments: &[String], mode: HtmlMode) -> String {
    match mode {
        HtmlMode::Heuristic => strip_html(fragments),
        HtmlMode::Render { width } => render_html(fragments, width),
    }
}

/// Joins the fragments with a blank line, turns the known break markup into
/// newlines, drops every other tag, then decodes entities. Tags go first so
/// that an escaped `&lt;b&gt;` survives as literal text.
pub fn strip_html(fragments: &[String]) -> String {
    let mut html = fragments.join("\n\n");
    for markup in LINE_BREAK_MARKUP {
        html = html.replace(markup, "\n");
    }
    let text = TAG_RE.replace_all(&html, "");
    decode_entities(&text)
}

/// Lays the fragments out with html2text. Falls back to [`strip_html`] if
/// the renderer gives up.
pub fn render_html(fragments: &[String], width: usize) -> String {
    let html = fragments.join("\n\n");
    match from_read(html.as_bytes(), width) {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "html2text failed, stripping tags instead");
            strip_html(fragments)
        }
    }
}

/// Replaces named and numeric character references, one at a time so that a
/// single unknown name does not stop the rest from decoding. Unknown names
/// and `&#0;` are left as written.
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[0];
            let numeric = caps.get(1).or_else(|| caps.get(2));
            if numeric.is_some_and(|n| n.as_str().trim_start_matches('0').is_empty()) {
                return entity.to_string();
            }
            decode_html(entity).unwrap_or_else(|_| entity.to_string())
        })
        .into_owned()
}
