// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Translator instance — runs the selector over the backends, with every
// backend call going through the retry policy.

use std::time::Instant;

use mittools_core::error::{MitToolsError, Result};
use tracing::{debug, info, instrument, warn};

use crate::backend::{Passthrough, TranslationBackend, TranslationRequest, TranslatorKind};
use crate::command::CommandBackend;
use crate::data::Data;
use crate::detect::detect;
use crate::glossary::Glossary;
use crate::language::Language;
use crate::retry::{RetryConfig, run_with_retry};
use crate::selector::{Hop, TranslatorSelector};

/// Output of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationStep {
    pub translator: TranslatorKind,
    pub from: Option<Language>,
    pub to: Language,
    pub text: String,
}

pub struct Translate {
    selector: TranslatorSelector,
    retry: RetryConfig,
    glossary: Glossary,
    command: Option<CommandBackend>,
}

impl Translate {
    pub fn new(
        selector: TranslatorSelector,
        retry: RetryConfig,
        glossary: Glossary,
        command: Option<CommandBackend>,
    ) -> Self {
        Self {
            selector,
            retry,
            glossary,
            command,
        }
    }

    pub fn selector(&self) -> &TranslatorSelector {
        &self.selector
    }

    fn backend(&self, kind: TranslatorKind) -> Result<&dyn TranslationBackend> {
        match kind {
            TranslatorKind::Passthrough => Ok(&Passthrough),
            TranslatorKind::Glossary => Ok(&self.glossary),
            TranslatorKind::Command => self
                .command
                .as_ref()
                .map(|c| c as &dyn TranslationBackend)
                .ok_or_else(|| {
                    MitToolsError::BackendUnavailable("no translator command configured".into())
                }),
        }
    }

    fn run(&self, hop: Hop, text: &str, context: Option<&str>) -> Result<TranslationStep> {
        let backend = self.backend(hop.translator)?;
        let request = TranslationRequest {
            text,
            from: hop.from,
            to: hop.to,
            context,
        };
        let output = run_with_retry(&self.retry, || backend.translate(&request))?;
        debug!(
            translator = %hop.translator,
            from = ?hop.from,
            to = %hop.to,
            "Translation step done"
        );
        Ok(TranslationStep {
            translator: hop.translator,
            from: hop.from,
            to: hop.to,
            text: output,
        })
    }

    /// Every backend call made for `text`, in order.
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub fn translate_steps(&self, text: &str, data: &Data) -> Result<Vec<TranslationStep>> {
        let context = data.context();
        let source = detect(text);
        debug!(?source, "Source language");

        match &self.selector {
            TranslatorSelector::List(entries) => {
                let mut last_err = None;
                for info in entries {
                    let hop = Hop {
                        translator: info.translator,
                        from: source,
                        to: info.to,
                    };
                    match self.run(hop, text, context) {
                        Ok(step) => return Ok(vec![step]),
                        Err(err) => {
                            warn!(translator = %info.translator, error = %err, "Translator failed, trying next");
                            last_err = Some(err);
                        }
                    }
                }
                Err(last_err.unwrap_or_else(|| {
                    MitToolsError::Translation("no translators configured".into())
                }))
            }
            TranslatorSelector::Chain(entries) => {
                let mut steps: Vec<TranslationStep> = Vec::with_capacity(entries.len());
                for info in entries {
                    let (input, from) = match steps.last() {
                        Some(prev) => (prev.text.as_str(), Some(prev.to)),
                        None => (text, source),
                    };
                    let hop = Hop {
                        translator: info.translator,
                        from,
                        to: info.to,
                    };
                    let step = self.run(hop, input, context)?;
                    steps.push(step);
                }
                Ok(steps)
            }
            TranslatorSelector::Selective(map, default) => {
                let translator = source
                    .and_then(|lang| map.get(&lang).copied())
                    .unwrap_or(default.translator);
                let hop = Hop {
                    translator,
                    from: source,
                    to: default.to,
                };
                Ok(vec![self.run(hop, text, context)?])
            }
            TranslatorSelector::SelectiveChain(map, default) => {
                let hops = TranslatorSelector::selective_chain_hops(map, default, source);
                let mut steps: Vec<TranslationStep> = Vec::with_capacity(hops.len());
                for hop in hops {
                    let input = steps.last().map_or(text, |prev| prev.text.as_str());
                    let step = self.run(hop, input, context)?;
                    steps.push(step);
                }
                Ok(steps)
            }
        }
    }

    /// Translate `text`, returning the output of the last step. Text that
    /// needs no step is returned unchanged.
    pub fn translate(&self, text: &str, data: &Data) -> Result<String> {
        let start = Instant::now();
        let steps = self.translate_steps(text, data)?;
        let out = steps
            .last()
            .map_or_else(|| text.to_string(), |step| step.text.clone());
        info!(
            steps = steps.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Translation finished"
        );
        Ok(out)
    }

    /// Translate each text independently.
    pub fn translate_vec<S: AsRef<str>>(&self, texts: &[S], data: &Data) -> Result<Vec<String>> {
        texts
            .iter()
            .map(|text| self.translate(text.as_ref(), data))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::TranslatorInfo;
    use std::collections::HashMap;

    fn data() -> Data {
        Data::new(None).with_retry(RetryConfig::none())
    }

    #[test]
    fn default_instance_translates_the_greeting() {
        let data = data();
        let translator = data.get_new_translator_instance().unwrap();
        assert_eq!(translator.translate("Hallo Welt", &data).unwrap(), "Hello world");
    }

    #[test]
    fn list_falls_through_to_next_translator() {
        let mut data = data();
        data.generate_list(&[("command", "en"), ("glossary", "en")]).unwrap();
        let translator = data.get_new_translator_instance().unwrap();
        let steps = translator.translate_steps("Hallo Welt", &data).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].translator, TranslatorKind::Glossary);
        assert_eq!(steps[0].text, "Hello world");
    }

    #[test]
    fn list_reports_last_error() {
        let mut data = data();
        data.generate_list(&[("command", "en")]).unwrap();
        let translator = data.get_new_translator_instance().unwrap();
        assert!(matches!(
            translator.translate("Hallo", &data),
            Err(MitToolsError::BackendUnavailable(_))
        ));

        data.generate_list(&[]).unwrap();
        let translator = data.get_new_translator_instance().unwrap();
        assert!(translator.translate("Hallo", &data).is_err());
    }

    #[test]
    fn chain_feeds_each_step_the_previous_output() {
        let mut data = data();
        data.generate_chain(&[("glossary", "en"), ("glossary", "fr")]).unwrap();
        let translator = data.get_new_translator_instance().unwrap();
        let steps = translator.translate_steps("Hallo Welt", &data).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].text, "Hello world");
        assert_eq!(steps[1].from, Some(Language::English));
        assert_eq!(steps[1].text, "Bonjour le monde");
        assert_eq!(translator.translate("Hallo Welt", &data).unwrap(), "Bonjour le monde");
    }

    const GERMAN: &str = "Die Katze sitzt auf dem Tisch und der Hund schläft unter dem Stuhl. \
                          Wir gehen heute Abend mit unseren Freunden in die Stadt, weil das \
                          Wetter endlich wieder schön ist und niemand zu Hause bleiben möchte.";

    #[test]
    fn selective_picks_backend_by_source() {
        let mut data = data();
        data.generate_selector_selective("en", "passthrough", &[("de", "glossary")])
            .unwrap();
        let translator = data.get_new_translator_instance().unwrap();

        let steps = translator.translate_steps(GERMAN, &data).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].translator, TranslatorKind::Glossary);
        assert_eq!(steps[0].from, Some(Language::German));
        assert!(steps[0].text.starts_with("The cat"));

        // No detectable language, so the passthrough default runs.
        let steps = translator.translate_steps("1234 5678", &data).unwrap();
        assert_eq!(steps[0].translator, TranslatorKind::Passthrough);
        assert_eq!(steps[0].from, None);
        assert_eq!(steps[0].text, "1234 5678");
    }

    #[test]
    fn selective_chain_hops_then_default() {
        let mut data = data();
        data.generate_selective_chain(&[("ja", "glossary", "en")], "de", "glossary")
            .unwrap();
        let translator = data.get_new_translator_instance().unwrap();
        let steps = translator.translate_steps("こんにちは世界", &data).unwrap();
        let texts: Vec<&str> = steps.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["hello world", "hallo Welt"]);
    }

    #[test]
    fn selective_chain_without_steps_returns_input() {
        let mut data = data();
        data.set_selector(TranslatorSelector::SelectiveChain(
            HashMap::new(),
            TranslatorInfo::new(TranslatorKind::Glossary, Language::Japanese),
        ));
        let translator = data.get_new_translator_instance().unwrap();
        assert!(translator.translate_steps("こんにちは世界", &data).unwrap().is_empty());
        assert_eq!(translator.translate("こんにちは世界", &data).unwrap(), "こんにちは世界");
    }

    #[test]
    fn translate_vec_keeps_order() {
        let data = data();
        let translator = data.get_new_translator_instance().unwrap();
        let out = translator
            .translate_vec(&["Hallo Welt", "Danke"], &data)
            .unwrap();
        assert_eq!(out, vec!["Hello world".to_string(), "Thanks".to_string()]);
    }
}
