// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::time::Instant;

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use mittools_core::ToolkitConfig;
use mittools_core::config::{SelectorConfig, SelectorMode};
use mittools_translate::{Data, TranslationStep};
use tracing::info;

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Text to translate.
    #[arg(default_value = "Hallo Welt")]
    pub text: String,

    /// Target language (code or English name). Defaults to the configured target.
    #[arg(long)]
    pub to: Option<String>,

    /// Translator to use (passthrough, glossary, command). Repeat to give a
    /// fallback list.
    #[arg(long = "translator")]
    pub translators: Vec<String>,

    /// Run the translators one after another instead of as fallbacks.
    #[arg(long)]
    pub chain: bool,

    /// Pick the translator by detected source language, as `LANG=TRANSLATOR`
    /// (or `LANG=TRANSLATOR:TARGET` with `--selective-chain`). Repeatable.
    #[arg(
        long = "by-language",
        value_name = "LANG=TRANSLATOR",
        conflicts_with_all = ["translators", "chain"]
    )]
    pub by_language: Vec<String>,

    /// Translator for source languages not named by `--by-language`.
    #[arg(long = "default", value_name = "TRANSLATOR", conflicts_with_all = ["translators", "chain"])]
    pub default_translator: Option<String>,

    /// Follow `--by-language` hops from language to language, then run the
    /// default translator into the target.
    #[arg(long, conflicts_with_all = ["translators", "chain"])]
    pub selective_chain: bool,

    /// Free-form context for backends that accept it.
    #[arg(long)]
    pub context: Option<String>,

    /// Print every translation step.
    #[arg(long)]
    pub steps: bool,
}

/// Build the translation context from the configuration and overrides.
pub fn build_data(config: &ToolkitConfig, args: &TranslateArgs) -> Result<Data> {
    let mut data = Data::from_config(&config.translate).context("translation settings")?;
    if let Some(context) = &args.context {
        data = data.with_context(context.clone());
    }

    let target = args
        .to
        .as_deref()
        .unwrap_or(config.translate.default_target.as_str());

    if !args.by_language.is_empty() || args.default_translator.is_some() || args.selective_chain {
        let selector = SelectorConfig {
            mode: if args.selective_chain {
                SelectorMode::SelectiveChain
            } else {
                SelectorMode::Selective
            },
            by_language: parse_by_language(&args.by_language)?,
            default: args
                .default_translator
                .clone()
                .unwrap_or_else(|| SelectorConfig::default().default),
            ..SelectorConfig::default()
        };
        data.apply_selector_config(&selector, target)?;
    } else if args.to.is_some() || !args.translators.is_empty() || args.chain {
        let kinds: Vec<&str> = if args.translators.is_empty() {
            vec!["glossary"]
        } else {
            args.translators.iter().map(String::as_str).collect()
        };
        let pairs: Vec<(&str, &str)> = kinds.into_iter().map(|kind| (kind, target)).collect();
        if args.chain {
            data.generate_chain(&pairs)?;
        } else {
            data.generate_list(&pairs)?;
        }
    }
    Ok(data)
}

fn parse_by_language(entries: &[String]) -> Result<BTreeMap<String, String>> {
    entries
        .iter()
        .map(|raw| {
            let (lang, entry) = raw
                .split_once('=')
                .ok_or_else(|| anyhow!("expected LANG=TRANSLATOR, got {raw:?}"))?;
            Ok((lang.trim().to_string(), entry.trim().to_string()))
        })
        .collect()
}

pub fn translate_steps(config: &ToolkitConfig, args: &TranslateArgs) -> Result<Vec<TranslationStep>> {
    let data = build_data(config, args)?;
    let translator = data.get_new_translator_instance()?;
    let steps = translator
        .translate_steps(&args.text, &data)
        .with_context(|| format!("translating {:?}", args.text))?;
    Ok(steps)
}

pub fn run(config: &ToolkitConfig, args: &TranslateArgs) -> Result<()> {
    let start = Instant::now();
    let steps = translate_steps(config, args)?;
    let elapsed = start.elapsed().as_millis();

    if args.steps {
        for step in &steps {
            let from = step.from.map_or("?", |lang| lang.code());
            println!("[{} {}→{}] {}", step.translator, from, step.to, step.text);
        }
    }
    let text = steps.last().map_or(args.text.as_str(), |step| step.text.as_str());
    println!("{text}");
    println!("{elapsed} ms");
    info!(steps = steps.len(), elapsed_ms = elapsed as u64, "Translate command done");
    Ok(())
}
