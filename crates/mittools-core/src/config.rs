// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Toolkit configuration, loaded from TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MitToolsError, Result};
use crate::types::ResizeFilter;

/// Persistent toolkit settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolkitConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
}

impl ToolkitConfig {
    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            MitToolsError::Config(format!("reading config {}: {}", path.display(), err))
        })?;
        let cfg: ToolkitConfig = toml::from_str(&raw)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(cfg)
    }

    /// Load `path` when given, otherwise fall back to defaults.
    ///
    /// An explicitly named file that does not exist is an error; only the
    /// absence of a path yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                debug!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Settings for text composition and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pixels per inch used to size PDF pages from pixel dimensions.
    pub dpi: f32,
    /// Line height as a multiple of the font size.
    pub line_spacing: f32,
    /// Smallest font size shrink-to-fit may reach.
    pub min_font_size: f32,
    /// Reduce the font size of overflowing text blocks.
    pub shrink_to_fit: bool,
    /// Search well-known system font locations after the configured ones.
    pub system_fonts: bool,
    /// Font files tried first, in order, for raster output.
    pub font_files: Vec<PathBuf>,
    /// Directories searched for a font whose file name matches the style.
    pub font_dirs: Vec<PathBuf>,
    /// Title written into PDF metadata.
    pub pdf_title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 72.0,
            line_spacing: 1.2,
            min_font_size: 6.0,
            shrink_to_fit: true,
            system_fonts: true,
            font_files: Vec::new(),
            font_dirs: Vec::new(),
            pdf_title: "mit-tools composition".into(),
        }
    }
}

/// Settings for image scaling and discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub default_filter: ResizeFilter,
    /// Lowercase file extensions treated as images.
    pub extensions: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            default_filter: ResizeFilter::Lanczos3,
            extensions: ["png", "jpg", "jpeg", "webp", "bmp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Settings for the translation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// ISO 639-1 code (or English name) of the default target language.
    pub default_target: String,
    /// Maximum retries of a transient backend failure.
    pub retry_count: u32,
    /// Base delay of the exponential backoff, in milliseconds.
    pub retry_delay_ms: u64,
    /// Upper bound of a single backoff delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Phrase table used by the glossary backend.
    pub glossary: Option<PathBuf>,
    /// External translator program used by the command backend.
    pub command: Option<CommandConfig>,
    /// Free-form context handed to backends that accept instructions.
    pub context: Option<String>,
    /// How translators are chosen. Without it a single glossary entry
    /// targets `default_target`.
    pub selector: Option<SelectorConfig>,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            default_target: "en".into(),
            retry_count: 3,
            retry_delay_ms: 500,
            max_delay_ms: 10_000,
            glossary: None,
            command: None,
            context: None,
            selector: None,
        }
    }
}

/// Shape of the translator selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorMode {
    /// Try `translators` in order until one succeeds.
    #[default]
    List,
    /// Feed each of `translators` the previous output.
    Chain,
    /// Pick the translator by detected source language.
    Selective,
    /// Hop from language to language, then run the default translator.
    SelectiveChain,
}

/// `[translate.selector]`. Entries are `"translator"` or
/// `"translator:target"`; a missing target is the default target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub mode: SelectorMode,
    /// Entries of `list` and `chain`.
    pub translators: Vec<String>,
    /// Source language to entry, for `selective` and `selective-chain`.
    pub by_language: BTreeMap<String, String>,
    /// Translator for languages missing from `by_language`.
    pub default: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            mode: SelectorMode::List,
            translators: Vec::new(),
            by_language: BTreeMap::new(),
            default: "glossary".into(),
        }
    }
}

/// An external program speaking the JSON translation protocol on stdio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// Kill the program after this many seconds.
    #[serde(default = "default_command_timeout")]
    pub timeout_secs: u64,
}

fn default_command_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_path() {
        let cfg = ToolkitConfig::load_or_default(None).unwrap();
        assert_eq!(cfg.render.dpi, 72.0);
        assert_eq!(cfg.image.default_filter, ResizeFilter::Lanczos3);
        assert_eq!(cfg.translate.default_target, "en");
        assert_eq!(cfg.translate.retry_count, 3);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[render]\ndpi = 150.0\nfont_dirs = [\"/opt/fonts\"]\n\n[translate]\ndefault_target = \"de\"\n\n[translate.command]\nprogram = \"/usr/bin/trans\"\n"
        )
        .unwrap();

        let cfg = ToolkitConfig::load(file.path()).unwrap();
        assert_eq!(cfg.render.dpi, 150.0);
        assert_eq!(cfg.render.font_dirs, vec![PathBuf::from("/opt/fonts")]);
        assert!(cfg.render.shrink_to_fit);
        assert_eq!(cfg.translate.default_target, "de");
        let command = cfg.translate.command.unwrap();
        assert_eq!(command.timeout_secs, 60);
        assert!(command.args.is_empty());
        assert_eq!(cfg.image.extensions.len(), 5);
    }

    #[test]
    fn selector_table_parses() {
        let cfg: ToolkitConfig = toml::from_str(
            "[translate.selector]\nmode = \"selective-chain\"\ndefault = \"passthrough\"\n\n[translate.selector.by_language]\nja = \"glossary:en\"\n",
        )
        .unwrap();
        let selector = cfg.translate.selector.unwrap();
        assert_eq!(selector.mode, SelectorMode::SelectiveChain);
        assert_eq!(selector.default, "passthrough");
        assert_eq!(selector.by_language.get("ja").map(String::as_str), Some("glossary:en"));
        assert!(selector.translators.is_empty());

        let cfg: ToolkitConfig = toml::from_str("[translate.selector]\nmode = \"chain\"\n").unwrap();
        assert_eq!(cfg.translate.selector.unwrap().default, "glossary");
        assert!(toml::from_str::<ToolkitConfig>("[translate.selector]\nmode = \"random\"\n").is_err());
    }

    #[test]
    fn filter_names_parse_from_toml() {
        let cfg: ToolkitConfig = toml::from_str("[image]\ndefault_filter = \"nearest\"\n").unwrap();
        assert_eq!(cfg.image.default_filter, ResizeFilter::Nearest);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = ToolkitConfig::load_or_default(Some(Path::new("/nonexistent/mittools.toml")));
        assert!(matches!(result, Err(MitToolsError::Config(_))));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render\ndpi = ").unwrap();
        assert!(matches!(
            ToolkitConfig::load(file.path()),
            Err(MitToolsError::Toml(_))
        ));
    }
}
