//! Plain-text body extraction for parsed MIME messages.
pub mod app;
pub mod classify;
pub mod cli;
pub mod config;
pub mod decode;
pub mod entity;
pub mod errors;
pub mod extract;
pub mod sanitize;
pub mod summary;
pub mod types;
pub mod walker;

pub use config::ExtractorConfig;
pub use entity::MimeEntity;
pub use extract::{extract_body, BodyExtractor, Extraction};
