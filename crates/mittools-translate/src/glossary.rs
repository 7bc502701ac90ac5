// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glossary translator — phrase tables per language pair, loaded from TOML.
//
// A request first tries the whole text as one phrase (ignoring surrounding
// punctuation); otherwise every word is looked up on its own and unknown
// words are kept. Sentence-initial and all-caps words pass their case on to
// the replacement.

use std::collections::HashMap;
use std::path::Path;

use mittools_core::error::{MitToolsError, Result};
use tracing::{debug, info};

use crate::backend::{TranslationBackend, TranslationRequest, TranslatorKind};
use crate::language::Language;

const BUILTIN: &str = include_str!("../data/glossary.toml");

type Table = HashMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct Glossary {
    tables: HashMap<(Language, Language), Table>,
}

impl Glossary {
    /// The phrase tables shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN)
    }

    /// Parse `[<from>.<to>]` sections of `phrase = "translation"` pairs.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, HashMap<String, Table>> = toml::from_str(raw)?;
        let mut glossary = Self::default();
        for (from, targets) in parsed {
            let from: Language = from.parse()?;
            for (to, entries) in targets {
                let to: Language = to.parse()?;
                for (phrase, translation) in entries {
                    glossary.insert(from, to, &phrase, translation);
                }
            }
        }
        Ok(glossary)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            MitToolsError::Config(format!("reading glossary {}: {}", path.display(), err))
        })?;
        let glossary = Self::from_toml_str(&raw)?;
        info!(path = %path.display(), entries = glossary.len(), "Glossary loaded");
        Ok(glossary)
    }

    pub fn insert(&mut self, from: Language, to: Language, phrase: &str, translation: String) {
        self.tables
            .entry((from, to))
            .or_default()
            .insert(normalise(phrase), translation);
    }

    /// Add every entry of `other`, replacing existing translations.
    pub fn merge(&mut self, other: Glossary) {
        for (pair, table) in other.tables {
            self.tables.entry(pair).or_default().extend(table);
        }
    }

    pub fn lookup(&self, from: Language, to: Language, phrase: &str) -> Option<&str> {
        self.tables
            .get(&(from, to))
            .and_then(|t| t.get(&normalise(phrase)))
            .map(String::as_str)
    }

    pub fn supports(&self, from: Language, to: Language) -> bool {
        self.tables.contains_key(&(from, to))
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pick the source table into `to` for text of unknown language: a
    /// whole-phrase match wins, otherwise the table knowing the most words.
    /// Ties go to the first language in code order.
    fn guess_source(&self, text: &str, to: Language) -> Option<Language> {
        let mut candidates: Vec<(Language, &Table)> = self
            .tables
            .iter()
            .filter(|((from, target), _)| *target == to && *from != to)
            .map(|((from, _), table)| (*from, table))
            .collect();
        candidates.sort_by_key(|(from, _)| from.code());

        let core = normalise(text.trim_matches(|c: char| !c.is_alphanumeric()));
        if let Some((from, _)) = candidates.iter().find(|(_, table)| table.contains_key(&core)) {
            debug!(from = %from, "Glossary source chosen by phrase");
            return Some(*from);
        }

        let words: Vec<String> = text
            .split(|c: char| !is_word_char(c))
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        let mut best: Option<(Language, usize)> = None;
        for (from, table) in &candidates {
            let known = words.iter().filter(|w| table.contains_key(*w)).count();
            if known > 0 && best.is_none_or(|(_, score)| known > score) {
                best = Some((*from, known));
            }
        }
        if let Some((from, known)) = best {
            debug!(from = %from, known, "Glossary source chosen by known words");
        }
        best.map(|(from, _)| from)
    }
}

impl TranslationBackend for Glossary {
    fn kind(&self) -> TranslatorKind {
        TranslatorKind::Glossary
    }

    fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        let from = match request.from {
            Some(from) => from,
            None => self.guess_source(request.text, request.to).ok_or_else(|| {
                MitToolsError::Translation(format!(
                    "no glossary into {} knows this text",
                    request.to
                ))
            })?,
        };
        if from == request.to {
            return Ok(request.text.to_string());
        }
        let table = self.tables.get(&(from, request.to)).ok_or_else(|| {
            MitToolsError::Translation(format!("no glossary from {from} to {}", request.to))
        })?;

        let text = request.text;
        let core = text.trim_matches(|c: char| !c.is_alphanumeric());
        if !core.is_empty() {
            if let Some(phrase) = table.get(&normalise(core)) {
                let start = text.len() - text.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
                let end = start + core.len();
                debug!(from = %from, to = %request.to, "Whole-phrase glossary match");
                return Ok(format!(
                    "{}{}{}",
                    &text[..start],
                    match_case(core, phrase),
                    &text[end..]
                ));
            }
        }

        Ok(word_by_word(text, table))
    }
}

fn normalise(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}

fn word_by_word(text: &str, table: &Table) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    let mut sentence_start = true;

    for ch in text.chars() {
        if is_word_char(ch) {
            word.push(ch);
            continue;
        }
        if !word.is_empty() {
            push_word(&mut out, &word, table, sentence_start);
            word.clear();
            sentence_start = false;
        }
        if matches!(ch, '.' | '!' | '?') {
            sentence_start = true;
        }
        out.push(ch);
    }
    if !word.is_empty() {
        push_word(&mut out, &word, table, sentence_start);
    }
    out
}

/// Append the translation of `word`, or `word` itself when unknown. Only
/// sentence-initial words pass their capital on; all-caps always does.
fn push_word(out: &mut String, word: &str, table: &Table, sentence_start: bool) {
    let Some(replacement) = table.get(&word.to_lowercase()) else {
        out.push_str(word);
        return;
    };
    let all_caps = word.chars().filter(|c| c.is_alphabetic()).count() > 1
        && word.chars().all(|c| !c.is_lowercase());
    if sentence_start || all_caps {
        out.push_str(&match_case(word, replacement));
    } else {
        out.push_str(replacement);
    }
}

/// Carry the capitalisation of `original` over to `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    let has_case = letters.iter().any(|c| c.is_uppercase() || c.is_lowercase());
    if !has_case {
        return replacement.to_string();
    }
    if letters.len() > 1 && letters.iter().all(|c| !c.is_lowercase()) {
        return replacement.to_uppercase();
    }
    if letters.first().is_some_and(|c| c.is_uppercase()) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}
