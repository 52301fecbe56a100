use encoding_rs::{Encoding, UTF_8};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::errors::{MailBodyError, MailBodyResult};

pub const DEFAULT_HTML_WIDTH: usize = 80;
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// How collected HTML fragments become text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlMode {
    /// Tag stripping plus entity decoding, no layout.
    Heuristic,
    /// Full rendering through html2text, wrapped at `width` columns.
    Render { width: usize },
}

/// What the outer traversal does with the parts inside a `multipart/related`
/// or `multipart/alternative` container after the container has been
/// extracted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedContainers {
    /// Visit them again, so their text can show up twice.
    Revisit,
    /// Skip them. Deviates from the historical output.
    Summarize,
}

/// Extractor settings. These can be overridden by env vars or a TOML file
/// but work without either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Charset for parts that declare none or an unknown one.
    pub default_charset: &'static Encoding,
    pub html_mode: HtmlMode,
    pub nested_containers: NestedContainers,
    /// Nesting guard applied before extraction; `None` disables it.
    pub max_depth: Option<usize>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            default_charset: UTF_8,
            html_mode: HtmlMode::Heuristic,
            nested_containers: NestedContainers::Revisit,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Unvalidated settings as they come from the environment or a file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    pub default_charset: Option<String>,
    pub html_mode: Option<String>,
    pub html_width: Option<usize>,
    pub nested: Option<String>,
    pub max_depth: Option<usize>,
}

impl RawSettings {
    pub fn from_env() -> MailBodyResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the `MAILBODY_*` variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> MailBodyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let html_width = parse_number(&lookup, "MAILBODY_HTML_WIDTH")?;
        let max_depth = parse_number(&lookup, "MAILBODY_MAX_DEPTH")?;
        Ok(Self {
            default_charset: lookup("MAILBODY_DEFAULT_CHARSET"),
            html_mode: lookup("MAILBODY_HTML_MODE"),
            html_width,
            nested: lookup("MAILBODY_NESTED"),
            max_depth,
        })
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> MailBodyResult<Option<usize>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| MailBodyError::Config(format!("{key}={raw:?}: {e}"))),
        None => Ok(None),
    }
}

impl ExtractorConfig {
    pub fn load() -> MailBodyResult<Self> {
        Self::resolve(RawSettings::from_env()?)
    }

    pub fn from_toml_file(path: &Path) -> MailBodyResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> MailBodyResult<Self> {
        let settings: RawSettings =
            toml::from_str(raw).map_err(|e| MailBodyError::Config(e.to_string()))?;
        Self::resolve(settings)
    }

    pub fn resolve(raw: RawSettings) -> MailBodyResult<Self> {
        let mut config = Self::default();

        if let Some(label) = raw.default_charset.as_deref() {
            config.default_charset = Encoding::for_label_no_replacement(label.trim().as_bytes())
                .ok_or_else(|| MailBodyError::Config(format!("unknown charset {label:?}")))?;
        }

        let width = raw.html_width.unwrap_or(DEFAULT_HTML_WIDTH);
        config.html_mode = match raw.html_mode.as_deref().map(str::trim) {
            None => HtmlMode::Heuristic,
            Some(m) if m.eq_ignore_ascii_case("heuristic") => HtmlMode::Heuristic,
            Some(m) if m.eq_ignore_ascii_case("render") => HtmlMode::Render { width },
            Some(other) => {
                return Err(MailBodyError::Config(format!("unknown html mode {other:?}")));
            }
        };

        config.nested_containers = match raw.nested.as_deref().map(str::trim) {
            None => NestedContainers::Revisit,
            Some(n) if n.eq_ignore_ascii_case("revisit") => NestedContainers::Revisit,
            Some(n) if n.eq_ignore_ascii_case("summarize") => NestedContainers::Summarize,
            Some(other) => {
                return Err(MailBodyError::Config(format!(
                    "unknown nested container policy {other:?}"
                )));
            }
        };

        // 0 turns the guard off
        if let Some(depth) = raw.max_depth {
            config.max_depth = (depth > 0).then_some(depth);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> MailBodyResult<ExtractorConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExtractorConfig::resolve(RawSettings::from_lookup(|key| vars.get(key).cloned())?)
    }

    #[test]
    fn empty_settings_give_defaults() {
        let config = ExtractorConfig::resolve(RawSettings::default()).unwrap();
        assert_eq!(config, ExtractorConfig::default());
    }

    #[test]
    fn toml_overrides_everything() {
        let config = ExtractorConfig::from_toml_str(
            r#"
            default_charset = "iso-8859-1"
            html_mode = "render"
            html_width = 100
            nested = "summarize"
            max_depth = 0
            "#,
        )
        .unwrap();
        // WHATWG maps latin1 labels onto windows-1252
        assert_eq!(config.default_charset, WINDOWS_1252);
        assert_eq!(config.html_mode, HtmlMode::Render { width: 100 });
        assert_eq!(config.nested_containers, NestedContainers::Summarize);
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn bad_values_are_config_errors() {
        for raw in [
            r#"default_charset = "klingon""#,
            r#"html_mode = "fancy""#,
            r#"nested = "sometimes""#,
            r#"colour = "blue""#,
        ] {
            assert!(
                matches!(ExtractorConfig::from_toml_str(raw), Err(MailBodyError::Config(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn env_variables_are_honoured() {
        let config = from_vars(&[
            ("MAILBODY_DEFAULT_CHARSET", "windows-1252"),
            ("MAILBODY_HTML_MODE", "Render"),
            ("MAILBODY_HTML_WIDTH", " 66 "),
            ("MAILBODY_NESTED", "summarize"),
            ("MAILBODY_MAX_DEPTH", "5"),
        ])
        .unwrap();
        assert_eq!(config.default_charset, WINDOWS_1252);
        assert_eq!(config.html_mode, HtmlMode::Render { width: 66 });
        assert_eq!(config.nested_containers, NestedContainers::Summarize);
        assert_eq!(config.max_depth, Some(5));
    }

    #[test]
    fn unset_env_gives_defaults() {
        assert_eq!(from_vars(&[]).unwrap(), ExtractorConfig::default());
    }

    #[test]
    fn bad_env_numbers_are_config_errors() {
        for (key, value) in [("MAILBODY_MAX_DEPTH", "abc"), ("MAILBODY_HTML_WIDTH", "-1")] {
            match from_vars(&[(key, value)]) {
                Err(MailBodyError::Config(msg)) => assert!(msg.contains(key), "{msg}"),
                other => panic!("{key}={value} gave {other:?}"),
            }
        }
    }

    #[test]
    fn replacement_charset_is_not_a_valid_default() {
        assert!(matches!(
            from_vars(&[("MAILBODY_DEFAULT_CHARSET", "iso-2022-kr")]),
            Err(MailBodyError::Config(_))
        ));
    }
}
