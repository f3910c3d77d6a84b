//! Text helpers shared by the search engine, filter inference and views.
//!
//! Catalog strings are French and mostly written without accents
//! (`"Materiel"`, `"Debutant"`), while user queries often carry them
//! (`"matériel"`). Matching therefore folds diacritics before comparing.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Display language of the storefront. French is the source language of
/// every catalog string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    En,
}

impl Language {
    /// The language catalog strings are written in.
    pub const SOURCE: Language = Language::Fr;

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    #[must_use]
    pub fn is_source(self) -> bool {
        self == Self::SOURCE
    }

    #[must_use]
    pub fn toggled(self) -> Language {
        match self {
            Language::Fr => Language::En,
            Language::En => Language::Fr,
        }
    }

    /// Compares two display strings the way a reader of this language
    /// expects a sorted list to look.
    ///
    /// Both French and English collation ignore case and accents at the
    /// primary level; the raw strings break exact ties so the order stays
    /// total.
    #[must_use]
    pub fn collate(self, left: &str, right: &str) -> Ordering {
        let primary = collation_key(left).cmp(&collation_key(right));
        match self {
            Language::Fr | Language::En => primary.then_with(|| left.cmp(right)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            other => Err(CoreError::UnknownLanguage(other.to_owned())),
        }
    }
}

/// Lower-cases, folds diacritics and trims. Used for accent-insensitive
/// keyword matching.
#[must_use]
pub fn normalize_search_text(value: &str) -> String {
    fold_diacritics(value).to_lowercase().trim().to_owned()
}

/// Sort key used by [`Language::collate`]: folded, lower-cased, with
/// punctuation kept so `"Sac a dos"` and `"Sac-a-dos"` stay distinct.
fn collation_key(value: &str) -> String {
    fold_diacritics(value).to_lowercase()
}

/// Replaces accented Latin letters with their base letter.
#[must_use]
pub fn fold_diacritics(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => out.push('a'),
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => out.push('A'),
            'ç' => out.push('c'),
            'Ç' => out.push('C'),
            'è' | 'é' | 'ê' | 'ë' => out.push('e'),
            'È' | 'É' | 'Ê' | 'Ë' => out.push('E'),
            'ì' | 'í' | 'î' | 'ï' => out.push('i'),
            'Ì' | 'Í' | 'Î' | 'Ï' => out.push('I'),
            'ñ' => out.push('n'),
            'Ñ' => out.push('N'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => out.push('o'),
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => out.push('O'),
            'ù' | 'ú' | 'û' | 'ü' => out.push('u'),
            'Ù' | 'Ú' | 'Û' | 'Ü' => out.push('U'),
            'ý' | 'ÿ' => out.push('y'),
            'Ý' | 'Ÿ' => out.push('Y'),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            other => out.push(other),
        }
    }
    out
}

/// `"FOOTBALL"` -> `"Football"`, `"  course a pied "` -> `"Course a pied"`.
///
/// Blank input is returned unchanged.
#[must_use]
pub fn to_sentence_case(value: &str) -> String {
    let normalized = value.trim().to_lowercase();
    let mut chars = normalized.chars();
    match chars.next() {
        None => value.to_owned(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_search_text_folds_accents_and_case() {
        assert_eq!(normalize_search_text("  Matériel Débutant "), "materiel debutant");
    }

    #[test]
    fn fold_diacritics_expands_ligatures() {
        assert_eq!(fold_diacritics("Cœur"), "Coeur");
    }

    #[test]
    fn sentence_case_lowercases_the_tail() {
        assert_eq!(to_sentence_case("FOOTBALL"), "Football");
        assert_eq!(to_sentence_case("course A PIED"), "Course a pied");
    }

    #[test]
    fn sentence_case_keeps_blank_input() {
        assert_eq!(to_sentence_case("   "), "   ");
    }

    #[test]
    fn collate_ignores_accents_at_primary_level() {
        assert_eq!(Language::Fr.collate("équipe", "Etoile"), Ordering::Less);
        assert_eq!(Language::Fr.collate("Zebre", "avion"), Ordering::Greater);
    }

    #[test]
    fn collate_breaks_ties_on_raw_text() {
        assert_ne!(Language::En.collate("Velo", "velo"), Ordering::Equal);
    }

    #[test]
    fn language_parses_codes_case_insensitively() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert!("de".parse::<Language>().is_err());
    }
}
