use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::text::to_sentence_case;
use crate::CoreError;

/// Product family. The wire and URL keys are the French upper-case names
/// used by the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CHAUSSURES")]
    Footwear,
    #[serde(rename = "MATERIEL")]
    Equipment,
    #[serde(rename = "TEXTILE")]
    Apparel,
    #[serde(rename = "ACCESSOIRES")]
    Accessories,
    #[serde(rename = "PROTECTION")]
    Protection,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Footwear,
        Category::Equipment,
        Category::Apparel,
        Category::Accessories,
        Category::Protection,
    ];

    /// Bucket for remote products that have no local counterpart.
    pub const GENERIC: Category = Category::Equipment;

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Category::Footwear => "CHAUSSURES",
            Category::Equipment => "MATERIEL",
            Category::Apparel => "TEXTILE",
            Category::Accessories => "ACCESSOIRES",
            Category::Protection => "PROTECTION",
        }
    }

    /// French display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Footwear => "Chaussures",
            Category::Equipment => "Materiel",
            Category::Apparel => "Textile",
            Category::Accessories => "Accessoires",
            Category::Protection => "Protection",
        }
    }

    /// Selling points shown on the detail view.
    #[must_use]
    pub fn features(self) -> [&'static str; 3] {
        match self {
            Category::Footwear => ["Respirabilite", "Amorti", "Maintien lateral"],
            Category::Equipment => ["Robustesse", "Performance", "Confort d'utilisation"],
            Category::Apparel => ["Respirant", "Leger", "Sechage rapide"],
            Category::Accessories => ["Pratique", "Compact", "Polyvalent"],
            Category::Protection => ["Protection ciblee", "Confort", "Maintien"],
        }
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownCategory(s.to_owned()))
    }
}

/// Skill level a product is suited for. Declaration order is the canonical
/// order used when levels are listed or serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Beginner,
    Average,
    Expert,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Average, Level::Expert];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Level::Beginner => "BEGINNER",
            Level::Average => "AVERAGE",
            Level::Expert => "EXPERT",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Level::Beginner => "Debutant",
            Level::Average => "Intermediaire",
            Level::Expert => "Expert",
        }
    }

    /// Vocabulary of the account backend (`niveauSportif`), which differs
    /// from the catalog's level keys.
    #[must_use]
    pub fn account_code(self) -> &'static str {
        match self {
            Level::Beginner => "DEBUTANT",
            Level::Average => "CONFIRME",
            Level::Expert => "EXPERT",
        }
    }
}

impl FromStr for Level {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|l| l.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownLevel(s.to_owned()))
    }
}

/// A sellable catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub category: Category,
    /// Sport keys, e.g. `"RUNNING"`. Order is kept for display.
    pub sports: Vec<String>,
    pub levels: Vec<Level>,
    /// French canonical name.
    pub name: String,
    pub description: String,
    /// Price in EUR.
    pub price: Decimal,
    /// The first image is the card image.
    pub images: Vec<String>,
    /// `None` means the stock is unknown, not empty.
    pub stock_count: Option<u32>,
}

impl Product {
    #[must_use]
    pub fn card_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn availability(&self) -> Availability {
        match self.stock_count {
            None => Availability::Unknown,
            Some(0) => Availability::OutOfStock,
            Some(n) => Availability::InStock(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    InStock(u32),
    OutOfStock,
    Unknown,
}

/// Entry of the sport vocabulary returned by `GET /api/sports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportOption {
    pub key: String,
    pub display_name: String,
}

impl SportOption {
    /// Builds an option from a raw API name, sentence-casing it for display.
    #[must_use]
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_owned(),
            display_name: to_sentence_case(name),
        }
    }
}

/// Sport key -> display name lookup.
#[derive(Debug, Clone, Default)]
pub struct SportLabels {
    by_key: HashMap<String, String>,
}

impl SportLabels {
    #[must_use]
    pub fn from_options(options: &[SportOption]) -> Self {
        Self {
            by_key: options
                .iter()
                .map(|o| (o.key.clone(), o.display_name.clone()))
                .collect(),
        }
    }

    /// Display name for `key`, falling back to the sentence-cased key.
    #[must_use]
    pub fn label(&self, key: &str) -> String {
        self.by_key
            .get(key)
            .cloned()
            .unwrap_or_else(|| to_sentence_case(key))
    }
}

/// Formats a price the French way: `59.99` -> `"59,99 €"`.
#[must_use]
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp(2);
    format!("{rounded:.2} €").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock_count: Option<u32>) -> Product {
        Product {
            id: "p-test".to_owned(),
            category: Category::Equipment,
            sports: vec!["TENNIS".to_owned()],
            levels: vec![Level::Beginner],
            name: "Raquette".to_owned(),
            description: String::new(),
            price: Decimal::new(8999, 2),
            images: vec![],
            stock_count,
        }
    }

    #[test]
    fn category_parses_wire_keys() {
        assert_eq!("textile".parse::<Category>().unwrap(), Category::Apparel);
        assert!("SHOES".parse::<Category>().is_err());
    }

    #[test]
    fn level_parses_wire_keys() {
        assert_eq!("AVERAGE".parse::<Level>().unwrap(), Level::Average);
        assert!("PRO".parse::<Level>().is_err());
    }

    #[test]
    fn level_maps_to_account_vocabulary() {
        assert_eq!(Level::Average.account_code(), "CONFIRME");
    }

    #[test]
    fn availability_distinguishes_unknown_from_empty() {
        assert_eq!(product(None).availability(), Availability::Unknown);
        assert_eq!(product(Some(0)).availability(), Availability::OutOfStock);
        assert_eq!(product(Some(4)).availability(), Availability::InStock(4));
    }

    #[test]
    fn card_image_is_none_without_images() {
        assert!(product(None).card_image().is_none());
    }

    #[test]
    fn sport_labels_fall_back_to_sentence_case() {
        let labels = SportLabels::from_options(&[SportOption::new("COURSE", "COURSE A PIED")]);
        assert_eq!(labels.label("COURSE"), "Course a pied");
        assert_eq!(labels.label("YOGA"), "Yoga");
    }

    #[test]
    fn format_price_uses_decimal_comma() {
        assert_eq!(format_price(Decimal::new(5999, 2)), "59,99 €");
        assert_eq!(format_price(Decimal::new(30, 0)), "30,00 €");
    }
}
