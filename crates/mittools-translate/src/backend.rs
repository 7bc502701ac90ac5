// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Translation backends and the identifiers used to select them.

use std::fmt;
use std::str::FromStr;

use mittools_core::error::{MitToolsError, Result};
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// One call to a backend.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    /// Source language when known.
    pub from: Option<Language>,
    pub to: Language,
    /// Free-form instructions for backends that accept them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a str>,
}

/// Something that turns text in one language into another.
pub trait TranslationBackend {
    fn kind(&self) -> TranslatorKind;

    fn translate(&self, request: &TranslationRequest<'_>) -> Result<String>;
}

/// Returns the text unchanged. Useful as a final fallback in a list and for
/// exercising selectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl TranslationBackend for Passthrough {
    fn kind(&self) -> TranslatorKind {
        TranslatorKind::Passthrough
    }

    fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        Ok(request.text.to_string())
    }
}

/// Backend identifiers accepted in selector definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorKind {
    Passthrough,
    Glossary,
    Command,
}

impl FromStr for TranslatorKind {
    type Err = MitToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" | "none" | "identity" => Ok(Self::Passthrough),
            "glossary" | "dictionary" => Ok(Self::Glossary),
            "command" | "external" => Ok(Self::Command),
            _ => Err(MitToolsError::UnknownTranslator(s.to_string())),
        }
    }
}

impl fmt::Display for TranslatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Passthrough => "passthrough",
            Self::Glossary => "glossary",
            Self::Command => "command",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_aliases() {
        assert_eq!("Glossary".parse::<TranslatorKind>().unwrap(), TranslatorKind::Glossary);
        assert_eq!("external".parse::<TranslatorKind>().unwrap(), TranslatorKind::Command);
        assert_eq!("none".parse::<TranslatorKind>().unwrap(), TranslatorKind::Passthrough);
        let err = "google".parse::<TranslatorKind>().unwrap_err();
        assert_eq!(err.to_string(), "translator format wrong: google");
    }

    #[test]
    fn passthrough_echoes() {
        let request = TranslationRequest {
            text: "unchanged",
            from: None,
            to: Language::English,
            context: None,
        };
        assert_eq!(Passthrough.translate(&request).unwrap(), "unchanged");
    }

    #[test]
    fn request_json_shape() {
        let request = TranslationRequest {
            text: "Hallo",
            from: Some(Language::German),
            to: Language::English,
            context: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "Hallo", "from": "de", "to": "en" })
        );
    }
}
