//! Walks a message's parts and sorts their text into buckets.
use tracing::debug;

use crate::classify::{classify, HandledType};
use crate::config::{ExtractorConfig, NestedContainers};
use crate::decode::ContentDecoder;
use crate::entity::{flatten_pruned, MimeEntity};
use crate::extract::BodyExtractor;

/// Text collected from one message, in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Buckets {
    pub text: Vec<String>,
    pub html: Vec<String>,
    /// Bodies of `multipart/related` containers, used when there is no text.
    pub alt_text: Vec<String>,
}

pub struct MimeTreeWalker {
    config: ExtractorConfig,
    decoder: ContentDecoder,
}

impl MimeTreeWalker {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            decoder: ContentDecoder::new(config.default_charset),
        }
    }

    /// Visits every part of `message` and returns what it collected.
    pub fn walk<E: MimeEntity>(&self, message: &E) -> Buckets {
        let summarize = self.config.nested_containers == NestedContainers::Summarize;
        let parts = flatten_pruned(message, |node| {
            summarize && classify(node).handled.is_summarizing_container()
        });

        let mut buckets = Buckets::default();
        for part in parts {
            self.process_part(part, &mut buckets);
        }
        buckets
    }

    pub fn process_part<E: MimeEntity>(&self, part: &E, buckets: &mut Buckets) {
        let class = classify(part);
        let ctype = &class.content_type;
        let charset = ctype.charset.as_deref();

        if class.is_attachment && !class.handled.is_summarizing_container() {
            debug!(
                mimetype = %ctype.mimetype,
                filename = ?class.disposition.filename,
                "Skipping attachment"
            );
            return;
        }

        match class.handled {
            HandledType::Related => {
                debug!("Extracting multipart/related as alternate text");
                buckets.alt_text.push(self.sub_extract(part));
            }
            HandledType::Alternative => {
                debug!("Extracting multipart/alternative as text");
                buckets.text.push(self.sub_extract(part));
            }
            HandledType::PlainText => {
                let mut content = self.decoder.decode(&part.content(), charset);
                if ctype.is_flowed() {
                    content = self.decoder.reflow(&content, ctype.delsp());
                }
                buckets.text.push(content);
            }
            HandledType::Html | HandledType::Enriched => {
                buckets.html.push(self.decoder.decode(&part.content(), charset));
            }
            HandledType::Other => {
                buckets.text.push(self.decoder.decode(&part.content(), charset));
            }
        }
    }

    /// Runs the whole extraction with `part` as the message.
    fn sub_extract<E: MimeEntity>(&self, part: &E) -> String {
        BodyExtractor::new(self.config).extract(part)
    }
}
