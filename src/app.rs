use crate::cli::Cli;
use crate::config::{ExtractorConfig, HtmlMode, NestedContainers, DEFAULT_HTML_WIDTH};
use crate::entity::check_structure;
use crate::errors::MailBodyResult;
use crate::extract::{BodyExtractor, Extraction};
use crate::summary::mime_summary;
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    extraction: &'a Extraction,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let extractor = BodyExtractor::new(config);
    debug!(?config, "Extractor configured");

    let start = Instant::now();
    // each message gets its own extraction; nothing is shared but the config
    let results: Vec<(PathBuf, MailBodyResult<Extraction>)> = cli
        .files
        .par_iter()
        .map(|path| (path.clone(), process_file(&extractor, path)))
        .collect();
    info!(
        files = results.len(),
        elapsed_ms = ?start.elapsed().as_millis(),
        "Extraction finished"
    );

    let many = results.len() > 1;
    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(extraction) => print_extraction(&cli, path, extraction, many)?,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not extract message body");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} message(s) failed", results.len());
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ExtractorConfig> {
    let mut config = match &cli.config {
        Some(path) => ExtractorConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ExtractorConfig::load().context("loading config from environment")?,
    };

    if cli.render_html {
        let width = match config.html_mode {
            HtmlMode::Render { width } => width,
            HtmlMode::Heuristic => DEFAULT_HTML_WIDTH,
        };
        config.html_mode = HtmlMode::Render { width };
    }
    if cli.summarize {
        config.nested_containers = NestedContainers::Summarize;
    }
    Ok(config)
}

/// Reads, parses, guards and extracts one message file.
pub fn process_file(extractor: &BodyExtractor, path: &Path) -> MailBodyResult<Extraction> {
    let raw = fs::read(path)?;
    let parsed = mailparse::parse_mail(&raw)?;
    check_structure(&parsed, extractor.config().max_depth)?;
    Ok(extractor.extract_report(&parsed))
}

fn print_extraction(cli: &Cli, path: &Path, extraction: &Extraction, many: bool) -> Result<()> {
    if cli.json {
        let report = FileReport { path, extraction };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing report")?
        );
        return Ok(());
    }

    if many {
        println!("==> {} <==", path.display());
    }
    if cli.outline {
        println!("{}", mime_summary(&extraction.parts));
        println!("{}", "-".repeat(40));
    }
    println!("{}", extraction.body);
    Ok(())
}
