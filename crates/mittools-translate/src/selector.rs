// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Translator selectors — which backend runs, towards which language, and in
// what order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::backend::TranslatorKind;
use crate::language::Language;

/// A backend and the language it should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorInfo {
    pub translator: TranslatorKind,
    pub to: Language,
}

impl TranslatorInfo {
    pub fn new(translator: TranslatorKind, to: Language) -> Self {
        Self { translator, to }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorSelector {
    /// Try each entry in order; the first success wins.
    List(Vec<TranslatorInfo>),
    /// Run every entry in order, each on the previous output.
    Chain(Vec<TranslatorInfo>),
    /// The detected source language picks the backend; unmapped languages
    /// use the default. The target is always the default's.
    Selective(HashMap<Language, TranslatorKind>, TranslatorInfo),
    /// Hop through the map from the detected language until reaching a
    /// language without an entry, then finish with the default unless the
    /// text is already in the default's target.
    SelectiveChain(HashMap<Language, TranslatorInfo>, TranslatorInfo),
}

impl Default for TranslatorSelector {
    fn default() -> Self {
        Self::List(vec![TranslatorInfo::new(
            TranslatorKind::Glossary,
            Language::English,
        )])
    }
}

/// One planned backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub translator: TranslatorKind,
    pub from: Option<Language>,
    pub to: Language,
}

impl TranslatorSelector {
    /// Ordered hops of a `SelectiveChain` starting from `source`.
    ///
    /// At most one hop per map entry is taken, so cyclic maps terminate.
    pub fn selective_chain_hops(
        map: &HashMap<Language, TranslatorInfo>,
        default: &TranslatorInfo,
        source: Option<Language>,
    ) -> Vec<Hop> {
        let mut hops = Vec::new();
        let mut current = source;
        while hops.len() < map.len() {
            let Some(lang) = current else { break };
            let Some(info) = map.get(&lang) else { break };
            if info.to == lang {
                break;
            }
            hops.push(Hop {
                translator: info.translator,
                from: Some(lang),
                to: info.to,
            });
            current = Some(info.to);
        }
        if current != Some(default.to) {
            hops.push(Hop {
                translator: default.translator,
                from: current,
                to: default.to,
            });
        }
        hops
    }
}
