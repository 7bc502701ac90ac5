// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source language detection with whatlang's trigram and script models.
// Guesses whatlang itself marks as unreliable are discarded, so very short
// or mixed text yields no language.

use tracing::trace;
use whatlang::Lang;

use crate::language::Language;

/// Best guess at the language of `text`, or `None` when the evidence is too
/// thin or the language is not one the translators know.
pub fn detect(text: &str) -> Option<Language> {
    let info = whatlang::detect(text)?;
    trace!(
        lang = info.lang().code(),
        confidence = info.confidence(),
        reliable = info.is_reliable(),
        "whatlang guess"
    );
    if !info.is_reliable() {
        return None;
    }
    from_whatlang(info.lang())
}

fn from_whatlang(lang: Lang) -> Option<Language> {
    let lang = match lang {
        Lang::Ara => Language::Arabic,
        Lang::Cmn => Language::Chinese,
        Lang::Ces => Language::Czech,
        Lang::Dan => Language::Danish,
        Lang::Nld => Language::Dutch,
        Lang::Eng => Language::English,
        Lang::Fin => Language::Finnish,
        Lang::Fra => Language::French,
        Lang::Deu => Language::German,
        Lang::Ell => Language::Greek,
        Lang::Heb => Language::Hebrew,
        Lang::Hin => Language::Hindi,
        Lang::Ind => Language::Indonesian,
        Lang::Ita => Language::Italian,
        Lang::Jpn => Language::Japanese,
        Lang::Kor => Language::Korean,
        Lang::Nob => Language::Norwegian,
        Lang::Pol => Language::Polish,
        Lang::Por => Language::Portuguese,
        Lang::Rus => Language::Russian,
        Lang::Spa => Language::Spanish,
        Lang::Swe => Language::Swedish,
        Lang::Tha => Language::Thai,
        Lang::Tur => Language::Turkish,
        Lang::Ukr => Language::Ukrainian,
        Lang::Vie => Language::Vietnamese,
        _ => return None,
    };
    Some(lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_language_scripts() {
        assert_eq!(detect("こんにちは世界、今日はいい天気ですね"), Some(Language::Japanese));
        assert_eq!(detect("안녕하세요 세계, 오늘 날씨가 좋네요"), Some(Language::Korean));
        assert_eq!(detect("Γειά σου κόσμε, τι κάνεις σήμερα;"), Some(Language::Greek));
    }

    #[test]
    fn latin_text_by_trigrams() {
        let german = "Die Katze sitzt auf dem Tisch und der Hund schläft unter dem Stuhl. \
                      Wir gehen heute Abend mit unseren Freunden in die Stadt, weil das Wetter \
                      endlich wieder schön ist und niemand zu Hause bleiben möchte.";
        assert_eq!(detect(german), Some(Language::German));

        let english = "The cat is sitting on the table and the dog is sleeping under the chair. \
                       We are going into town with our friends this evening, because the weather \
                       is finally nice again and nobody wants to stay at home.";
        assert_eq!(detect(english), Some(Language::English));
    }

    #[test]
    fn too_little_evidence() {
        assert_eq!(detect(""), None);
        assert_eq!(detect("12345 !!"), None);
        assert_eq!(detect("  \n\t"), None);
    }

    #[test]
    fn languages_without_translators_are_dropped() {
        let esperanto = "Ĉu vi ne volas eklerni Esperanton? Bonvolu! Estas unu de la plej bonaj aferoj!";
        assert_eq!(whatlang::detect(esperanto).map(|i| i.lang()), Some(Lang::Epo));
        assert_eq!(detect(esperanto), None);
    }

    #[test]
    fn every_language_has_a_whatlang_counterpart() {
        let mapped: Vec<Language> = Lang::all().iter().filter_map(|l| from_whatlang(*l)).collect();
        for lang in Language::all() {
            assert!(mapped.contains(&lang), "{lang} has no whatlang mapping");
        }
    }
}
