// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Translation context — selector, retry policy, backend settings, and the
// free-form context string. Translator instances are created from it.

use std::collections::HashMap;
use std::path::PathBuf;

use mittools_core::config::{CommandConfig, SelectorConfig, SelectorMode, TranslateConfig};
use mittools_core::error::Result;
use tracing::{debug, info};

use crate::backend::TranslatorKind;
use crate::command::CommandBackend;
use crate::glossary::Glossary;
use crate::language::Language;
use crate::retry::RetryConfig;
use crate::selector::{TranslatorInfo, TranslatorSelector};
use crate::translate::Translate;

#[derive(Debug, Clone)]
pub struct Data {
    context: Option<String>,
    retry: RetryConfig,
    selector: TranslatorSelector,
    glossary: Option<PathBuf>,
    command: Option<CommandConfig>,
}

/// `"translator"` or `"translator:target"`; `target` fills a missing target.
fn split_entry<'a>(entry: &'a str, target: &'a str) -> (&'a str, &'a str) {
    match entry.split_once(':') {
        Some((translator, to)) => (translator.trim(), to.trim()),
        None => (entry.trim(), target),
    }
}

fn info_from(translator: &str, to: &str) -> Result<TranslatorInfo> {
    Ok(TranslatorInfo::new(
        translator.parse::<TranslatorKind>()?,
        to.parse::<Language>()?,
    ))
}

impl Data {
    /// Defaults: glossary translation to English, retry policy from the
    /// default configuration.
    pub fn new(context: Option<String>) -> Self {
        Self {
            context,
            retry: RetryConfig::default(),
            selector: TranslatorSelector::default(),
            glossary: None,
            command: None,
        }
    }

    /// Build from the `[translate]` configuration section.
    pub fn from_config(config: &TranslateConfig) -> Result<Self> {
        let target: Language = config.default_target.parse()?;
        let mut data = Self {
            context: config.context.clone(),
            retry: RetryConfig::from(config),
            selector: TranslatorSelector::List(vec![TranslatorInfo::new(
                TranslatorKind::Glossary,
                target,
            )]),
            glossary: config.glossary.clone(),
            command: config.command.clone(),
        };
        if let Some(selector) = &config.selector {
            data.apply_selector_config(selector, &config.default_target)?;
        }
        Ok(data)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_glossary(mut self, path: impl Into<PathBuf>) -> Self {
        self.glossary = Some(path.into());
        self
    }

    pub fn with_command(mut self, command: CommandConfig) -> Self {
        self.command = Some(command);
        self
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn selector(&self) -> &TranslatorSelector {
        &self.selector
    }

    pub fn set_selector(&mut self, selector: TranslatorSelector) {
        debug!(?selector, "Selector replaced");
        self.selector = selector;
    }

    /// `(translator, target)` pairs tried in order until one succeeds.
    pub fn generate_list(&mut self, translators: &[(&str, &str)]) -> Result<()> {
        let list = translators
            .iter()
            .map(|(translator, to)| info_from(translator, to))
            .collect::<Result<Vec<_>>>()?;
        self.set_selector(TranslatorSelector::List(list));
        Ok(())
    }

    /// `(translator, target)` pairs run one after another.
    pub fn generate_chain(&mut self, translators: &[(&str, &str)]) -> Result<()> {
        let chain = translators
            .iter()
            .map(|(translator, to)| info_from(translator, to))
            .collect::<Result<Vec<_>>>()?;
        self.set_selector(TranslatorSelector::Chain(chain));
        Ok(())
    }

    /// `(source language, translator)` pairs choosing the backend by the
    /// detected language; everything goes to `target`.
    pub fn generate_selector_selective(
        &mut self,
        target: &str,
        default_translator: &str,
        translators: &[(&str, &str)],
    ) -> Result<()> {
        let mut map = HashMap::new();
        for (lang, translator) in translators {
            map.insert(
                lang.parse::<Language>()?,
                translator.parse::<TranslatorKind>()?,
            );
        }
        let default = info_from(default_translator, target)?;
        self.set_selector(TranslatorSelector::Selective(map, default));
        Ok(())
    }

    /// `(source, translator, target)` hops followed from the detected
    /// language, ending with the default translator into `default_target`.
    pub fn generate_selective_chain(
        &mut self,
        translators: &[(&str, &str, &str)],
        default_target: &str,
        default_translator: &str,
    ) -> Result<()> {
        let mut map = HashMap::new();
        for (from, translator, to) in translators {
            map.insert(from.parse::<Language>()?, info_from(translator, to)?);
        }
        let default = info_from(default_translator, default_target)?;
        self.set_selector(TranslatorSelector::SelectiveChain(map, default));
        Ok(())
    }

    /// Install the selector described by `config`. Entries without their
    /// own target translate into `target`.
    pub fn apply_selector_config(&mut self, config: &SelectorConfig, target: &str) -> Result<()> {
        match config.mode {
            SelectorMode::List | SelectorMode::Chain => {
                let pairs: Vec<(&str, &str)> = config
                    .translators
                    .iter()
                    .map(|entry| split_entry(entry, target))
                    .collect();
                if config.mode == SelectorMode::Chain {
                    self.generate_chain(&pairs)?;
                } else {
                    self.generate_list(&pairs)?;
                }
            }
            SelectorMode::Selective => {
                let pairs: Vec<(&str, &str)> = config
                    .by_language
                    .iter()
                    .map(|(lang, translator)| (lang.as_str(), translator.trim()))
                    .collect();
                self.generate_selector_selective(target, &config.default, &pairs)?;
            }
            SelectorMode::SelectiveChain => {
                let hops: Vec<(&str, &str, &str)> = config
                    .by_language
                    .iter()
                    .map(|(from, entry)| {
                        let (translator, to) = split_entry(entry, target);
                        (from.as_str(), translator, to)
                    })
                    .collect();
                self.generate_selective_chain(&hops, target, &config.default)?;
            }
        }
        debug!(mode = ?config.mode, "Selector configured");
        Ok(())
    }

    /// Create a translator with the current selector and backend settings.
    pub fn get_new_translator_instance(&self) -> Result<Translate> {
        let mut glossary = Glossary::builtin()?;
        if let Some(path) = &self.glossary {
            glossary.merge(Glossary::load(path)?);
        }
        let command = self.command.as_ref().map(CommandBackend::from_config);
        info!(
            entries = glossary.len(),
            command = command.is_some(),
            "Translator instance created"
        );
        Ok(Translate::new(
            self.selector.clone(),
            self.retry.clone(),
            glossary,
            command,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mittools_core::error::MitToolsError;

    #[test]
    fn new_uses_default_selector() {
        let data = Data::new(Some("formal tone".into()));
        assert_eq!(data.context(), Some("formal tone"));
        assert_eq!(data.selector(), &TranslatorSelector::default());
    }

    #[test]
    fn from_config_targets_default_language() {
        let config = TranslateConfig {
            default_target: "fr".into(),
            retry_count: 1,
            ..TranslateConfig::default()
        };
        let data = Data::from_config(&config).unwrap();
        assert_eq!(
            data.selector(),
            &TranslatorSelector::List(vec![TranslatorInfo::new(
                TranslatorKind::Glossary,
                Language::French
            )])
        );
        assert_eq!(data.retry().max_retries, 1);

        let bad = TranslateConfig {
            default_target: "xx".into(),
            ..TranslateConfig::default()
        };
        assert!(matches!(Data::from_config(&bad), Err(MitToolsError::UnknownLanguage(_))));
    }

    #[test]
    fn generators_parse_their_pairs() {
        let mut data = Data::new(None);
        data.generate_chain(&[("glossary", "de"), ("passthrough", "English")])
            .unwrap();
        assert_eq!(
            data.selector(),
            &TranslatorSelector::Chain(vec![
                TranslatorInfo::new(TranslatorKind::Glossary, Language::German),
                TranslatorInfo::new(TranslatorKind::Passthrough, Language::English),
            ])
        );

        data.generate_selector_selective("en", "passthrough", &[("de", "glossary")])
            .unwrap();
        match data.selector() {
            TranslatorSelector::Selective(map, default) => {
                assert_eq!(map.get(&Language::German), Some(&TranslatorKind::Glossary));
                assert_eq!(default.translator, TranslatorKind::Passthrough);
            }
            other => panic!("unexpected selector {other:?}"),
        }

        data.generate_selective_chain(&[("ja", "glossary", "en")], "de", "glossary")
            .unwrap();
        assert!(matches!(data.selector(), TranslatorSelector::SelectiveChain(..)));
    }

    #[test]
    fn selector_table_builds_every_mode() {
        let mut config = TranslateConfig {
            default_target: "de".into(),
            selector: Some(SelectorConfig {
                mode: SelectorMode::Selective,
                by_language: [("ja".to_string(), "glossary".to_string())].into(),
                default: "passthrough".into(),
                ..SelectorConfig::default()
            }),
            ..TranslateConfig::default()
        };
        let data = Data::from_config(&config).unwrap();
        match data.selector() {
            TranslatorSelector::Selective(map, default) => {
                assert_eq!(map.get(&Language::Japanese), Some(&TranslatorKind::Glossary));
                assert_eq!(default, &TranslatorInfo::new(TranslatorKind::Passthrough, Language::German));
            }
            other => panic!("unexpected selector {other:?}"),
        }

        config.selector = Some(SelectorConfig {
            mode: SelectorMode::SelectiveChain,
            by_language: [("ja".to_string(), "glossary:en".to_string())].into(),
            ..SelectorConfig::default()
        });
        let data = Data::from_config(&config).unwrap();
        match data.selector() {
            TranslatorSelector::SelectiveChain(map, default) => {
                assert_eq!(
                    map.get(&Language::Japanese),
                    Some(&TranslatorInfo::new(TranslatorKind::Glossary, Language::English))
                );
                assert_eq!(default, &TranslatorInfo::new(TranslatorKind::Glossary, Language::German));
            }
            other => panic!("unexpected selector {other:?}"),
        }

        config.selector = Some(SelectorConfig {
            mode: SelectorMode::Chain,
            translators: vec!["glossary:en".into(), "passthrough".into()],
            ..SelectorConfig::default()
        });
        let data = Data::from_config(&config).unwrap();
        assert_eq!(
            data.selector(),
            &TranslatorSelector::Chain(vec![
                TranslatorInfo::new(TranslatorKind::Glossary, Language::English),
                TranslatorInfo::new(TranslatorKind::Passthrough, Language::German),
            ])
        );

        config.selector = Some(SelectorConfig {
            mode: SelectorMode::Selective,
            by_language: [("ja".to_string(), "deepl".to_string())].into(),
            ..SelectorConfig::default()
        });
        assert!(matches!(Data::from_config(&config), Err(MitToolsError::UnknownTranslator(_))));
    }

    #[test]
    fn generator_errors_keep_previous_selector() {
        let mut data = Data::new(None);
        let err = data.generate_list(&[("google", "en")]).unwrap_err();
        assert_eq!(err.to_string(), "translator format wrong: google");
        let err = data.generate_list(&[("glossary", "elvish")]).unwrap_err();
        assert_eq!(err.to_string(), "language does not exist: elvish");
        assert_eq!(data.selector(), &TranslatorSelector::default());
    }

    #[test]
    fn missing_glossary_file_fails_instance_creation() {
        let data = Data::new(None).with_glossary("/nonexistent/glossary.toml");
        assert!(matches!(
            data.get_new_translator_instance(),
            Err(MitToolsError::Config(_))
        ));
    }
}
