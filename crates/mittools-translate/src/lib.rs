// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mittools-translate — Translation for mit-tools.
//
// A `Data` context holds the translator selector (list, chain, selective, or
// selective chain) and backend settings. Translator instances created from
// it detect the source language and run the selected backends: the glossary
// phrase tables, an external command speaking JSON on stdio, or passthrough.

pub mod backend;
pub mod command;
pub mod data;
pub mod detect;
pub mod glossary;
pub mod language;
pub mod retry;
pub mod selector;
pub mod translate;

pub use backend::{Passthrough, TranslationBackend, TranslationRequest, TranslatorKind};
pub use command::CommandBackend;
pub use data::Data;
pub use detect::detect;
pub use glossary::Glossary;
pub use language::Language;
pub use retry::RetryConfig;
pub use selector::{TranslatorInfo, TranslatorSelector};
pub use translate::{Translate, TranslationStep};
