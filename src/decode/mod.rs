//! Bytes to text: charset decoding and flowed reflow.
pub mod flowed;

use encoding_rs::Encoding;
use tracing::debug;

/// Turns part content into text. Charsets the decoder does not know fall
/// back to the default instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct ContentDecoder {
    default_charset: &'static Encoding,
}

impl ContentDecoder {
    pub fn new(default_charset: &'static Encoding) -> Self {
        Self { default_charset }
    }

    pub fn encoding_for(&self, charset: Option<&str>) -> &'static Encoding {
        let Some(label) = charset else {
            return self.default_charset;
        };
        // replacement labels (iso-2022-kr etc.) count as unknown
        match Encoding::for_label_no_replacement(label.trim().as_bytes()) {
            Some(encoding) => encoding,
            None => {
                debug!(
                    charset = label,
                    fallback = self.default_charset.name(),
                    "Unknown charset, using default"
                );
                self.default_charset
            }
        }
    }

    pub fn decode(&self, raw: &[u8], charset: Option<&str>) -> String {
        let encoding = self.encoding_for(charset);
        let (text, had_errors) = encoding.decode_with_bom_removal(raw);
        if had_errors {
            debug!(charset = encoding.name(), "Malformed input replaced while decoding");
        }
        text.into_owned()
    }

    pub fn reflow(&self, text: &str, delsp: bool) -> String {
        flowed::reflow(text, delsp)
    }
}
