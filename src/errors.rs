use thiserror::Error;

pub type MailBodyResult<T> = Result<T, MailBodyError>;

/// Failures at the edges of extraction. Extraction itself never fails.
#[derive(Error, Debug)]
pub enum MailBodyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] mailparse::MailParseError),
    #[error("Config error: {0}")]
    Config(String),
    #[error("MIME tree reaches depth {depth}, limit is {limit}")]
    TooDeep { depth: usize, limit: usize },
    #[error("Part {path} is not multipart but has {children} child part(s)")]
    StructureViolation { path: String, children: usize },
}
