use clap::Parser;
use std::path::PathBuf;

/// Command-line options for mailbody.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// RFC 822 message files (.eml) to extract bodies from
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Print a JSON report (body, attachment flag, part outline) per message.
    #[arg(long)]
    pub json: bool,

    /// Print the part outline above each body.
    #[arg(long)]
    pub outline: bool,

    /// Read extractor settings from a TOML file instead of the environment.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Render HTML bodies with html2text instead of stripping tags.
    #[arg(long)]
    pub render_html: bool,

    /// Do not revisit parts already extracted through their
    /// multipart/related or multipart/alternative container.
    #[arg(long)]
    pub summarize: bool,
}
