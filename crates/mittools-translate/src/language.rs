// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::fmt;
use std::str::FromStr;

use mittools_core::error::MitToolsError;
use serde::{Deserialize, Serialize};

/// Languages known to the translators, identified by ISO 639-1 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    Arabic,
    Chinese,
    Czech,
    Danish,
    Dutch,
    English,
    Finnish,
    French,
    German,
    Greek,
    Hebrew,
    Hindi,
    Indonesian,
    Italian,
    Japanese,
    Korean,
    Norwegian,
    Polish,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
    Thai,
    Turkish,
    Ukrainian,
    Vietnamese,
}

const ALL: [Language; 26] = [
    Language::Arabic,
    Language::Chinese,
    Language::Czech,
    Language::Danish,
    Language::Dutch,
    Language::English,
    Language::Finnish,
    Language::French,
    Language::German,
    Language::Greek,
    Language::Hebrew,
    Language::Hindi,
    Language::Indonesian,
    Language::Italian,
    Language::Japanese,
    Language::Korean,
    Language::Norwegian,
    Language::Polish,
    Language::Portuguese,
    Language::Russian,
    Language::Spanish,
    Language::Swedish,
    Language::Thai,
    Language::Turkish,
    Language::Ukrainian,
    Language::Vietnamese,
];

impl Language {
    /// ISO 639-1 code, e.g. `"de"`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Arabic => "ar",
            Self::Chinese => "zh",
            Self::Czech => "cs",
            Self::Danish => "da",
            Self::Dutch => "nl",
            Self::English => "en",
            Self::Finnish => "fi",
            Self::French => "fr",
            Self::German => "de",
            Self::Greek => "el",
            Self::Hebrew => "he",
            Self::Hindi => "hi",
            Self::Indonesian => "id",
            Self::Italian => "it",
            Self::Japanese => "ja",
            Self::Korean => "ko",
            Self::Norwegian => "no",
            Self::Polish => "pl",
            Self::Portuguese => "pt",
            Self::Russian => "ru",
            Self::Spanish => "es",
            Self::Swedish => "sv",
            Self::Thai => "th",
            Self::Turkish => "tr",
            Self::Ukrainian => "uk",
            Self::Vietnamese => "vi",
        }
    }

    /// English name, e.g. `"German"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arabic => "Arabic",
            Self::Chinese => "Chinese",
            Self::Czech => "Czech",
            Self::Danish => "Danish",
            Self::Dutch => "Dutch",
            Self::English => "English",
            Self::Finnish => "Finnish",
            Self::French => "French",
            Self::German => "German",
            Self::Greek => "Greek",
            Self::Hebrew => "Hebrew",
            Self::Hindi => "Hindi",
            Self::Indonesian => "Indonesian",
            Self::Italian => "Italian",
            Self::Japanese => "Japanese",
            Self::Korean => "Korean",
            Self::Norwegian => "Norwegian",
            Self::Polish => "Polish",
            Self::Portuguese => "Portuguese",
            Self::Russian => "Russian",
            Self::Spanish => "Spanish",
            Self::Swedish => "Swedish",
            Self::Thai => "Thai",
            Self::Turkish => "Turkish",
            Self::Ukrainian => "Ukrainian",
            Self::Vietnamese => "Vietnamese",
        }
    }

    pub fn all() -> impl Iterator<Item = Language> {
        ALL.into_iter()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = MitToolsError;

    /// Accepts codes (`"de"`) and English names (`"German"`), ignoring case.
    /// Regional suffixes such as `"pt-BR"` or `"zh_TW"` are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let base = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or(trimmed);
        ALL.into_iter()
            .find(|lang| {
                base.eq_ignore_ascii_case(lang.code()) || trimmed.eq_ignore_ascii_case(lang.name())
            })
            .ok_or_else(|| MitToolsError::UnknownLanguage(s.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = MitToolsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("de".parse::<Language>().unwrap(), Language::German);
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert_eq!("JA".parse::<Language>().unwrap(), Language::Japanese);
        assert_eq!("pt-BR".parse::<Language>().unwrap(), Language::Portuguese);
    }

    #[test]
    fn unknown_language_error() {
        let err = "klingon".parse::<Language>().unwrap_err();
        assert!(matches!(err, MitToolsError::UnknownLanguage(ref s) if s == "klingon"));
        assert_eq!(err.to_string(), "language does not exist: klingon");
    }

    #[test]
    fn every_variant_has_its_own_code() {
        let mut codes: Vec<&str> = Language::all().map(|l| l.code()).collect();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
        for lang in Language::all() {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(Language::Ukrainian.name(), "Ukrainian");
        for lang in Language::all() {
            assert_eq!(lang.name().parse::<Language>().unwrap(), lang);
            assert_eq!(lang.name().to_lowercase().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn serde_uses_codes() {
        let json = serde_json::to_string(&Language::French).unwrap();
        assert_eq!(json, "\"fr\"");
        let back: Language = serde_json::from_str("\"it\"").unwrap();
        assert_eq!(back, Language::Italian);
    }
}
