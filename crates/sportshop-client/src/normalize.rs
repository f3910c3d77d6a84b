//! Wire records -> domain [`Product`]s, enriched from the seed catalog.
//!
//! Remote `sports`, `levels`, `name`, `price` and `stock_count` win over the
//! seed record of the same id; `category`, `description` and `images` come
//! from the seed. Ids the seed does not know get the generic category and an
//! empty description.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use sportshop_core::{Category, Language, Level, Product, SeedCatalog, SportOption};

use crate::types::{ApiProduct, ApiSport};

/// Outcome of reading one loosely typed wire field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WireField<T> {
    Absent,
    Invalid(String),
    Parsed(T),
}

impl<T> WireField<T> {
    fn ok(self) -> Option<T> {
        match self {
            WireField::Parsed(value) => Some(value),
            WireField::Absent | WireField::Invalid(_) => None,
        }
    }
}

/// Reads a price sent as a JSON number or a numeric string. Negative
/// amounts are invalid.
pub(crate) fn parse_price(raw: Option<&Value>) -> WireField<Decimal> {
    let parsed = match raw {
        None | Some(Value::Null) => return WireField::Absent,
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string())),
        Some(Value::String(s)) => Decimal::from_str(s.trim()),
        Some(other) => return WireField::Invalid(other.to_string()),
    };
    match parsed {
        Ok(price) if !price.is_sign_negative() => WireField::Parsed(price),
        Ok(price) => WireField::Invalid(price.to_string()),
        Err(e) => WireField::Invalid(e.to_string()),
    }
}

/// Reads a stock count sent as a non-negative integer or integer string.
pub(crate) fn parse_stock(raw: Option<&Value>) -> WireField<u32> {
    match raw {
        None | Some(Value::Null) => WireField::Absent,
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map_or_else(|| WireField::Invalid(n.to_string()), WireField::Parsed),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map_or_else(|e| WireField::Invalid(e.to_string()), WireField::Parsed),
        Some(other) => WireField::Invalid(other.to_string()),
    }
}

fn parse_levels(raw: &[String]) -> Vec<Level> {
    let mut levels = Vec::with_capacity(raw.len());
    for value in raw {
        match Level::from_str(value) {
            Ok(level) if !levels.contains(&level) => levels.push(level),
            Ok(_) => {}
            Err(_) => tracing::debug!(level = %value, "dropping unknown level"),
        }
    }
    levels
}

/// Merges one wire record with its seed counterpart.
#[must_use]
pub fn normalize_product(row: &ApiProduct, seed: &SeedCatalog) -> Product {
    let fallback = seed.product(&row.id);

    let price = match parse_price(row.price.as_ref()) {
        WireField::Parsed(price) => Some(price),
        WireField::Invalid(reason) => {
            tracing::debug!(id = %row.id, %reason, "unparsable price, using fallback");
            None
        }
        WireField::Absent => None,
    }
    .or_else(|| fallback.map(|p| p.price))
    .unwrap_or(Decimal::ZERO);

    let stock_count = parse_stock(row.stock_count.as_ref())
        .ok()
        .or_else(|| fallback.and_then(|p| p.stock_count));

    let sports = if row.sports.is_empty() {
        fallback.map(|p| p.sports.clone()).unwrap_or_default()
    } else {
        row.sports.clone()
    };

    let levels = parse_levels(&row.levels);
    let levels = if levels.is_empty() {
        fallback.map(|p| p.levels.clone()).unwrap_or_default()
    } else {
        levels
    };

    let name = row
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .or_else(|| fallback.map(|p| p.name.clone()))
        .unwrap_or_else(|| row.id.clone());

    let images = match (fallback, row.card_image.as_deref()) {
        (Some(p), _) => p.images.clone(),
        (None, Some(card)) if !card.trim().is_empty() => vec![card.to_owned()],
        (None, _) => Vec::new(),
    };

    Product {
        id: row.id.clone(),
        category: fallback.map_or(Category::GENERIC, |p| p.category),
        sports,
        levels,
        name,
        description: fallback.map(|p| p.description.clone()).unwrap_or_default(),
        price,
        images,
        stock_count,
    }
}

/// Normalizes a batch, deduplicating by id: the last record wins but keeps
/// the position of the first occurrence.
#[must_use]
pub fn normalize_products(rows: &[ApiProduct], seed: &SeedCatalog) -> Vec<Product> {
    let mut products: Vec<Product> = Vec::with_capacity(rows.len());
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(rows.len());

    for row in rows {
        let product = normalize_product(row, seed);
        match positions.get(row.id.as_str()) {
            Some(&index) => products[index] = product,
            None => {
                positions.insert(row.id.as_str(), products.len());
                products.push(product);
            }
        }
    }

    products
}

/// Sport rows -> options sorted by French display name.
#[must_use]
pub fn normalize_sports(rows: &[ApiSport]) -> Vec<SportOption> {
    let mut options: Vec<SportOption> = rows
        .iter()
        .filter(|row| !row.key.trim().is_empty())
        .map(|row| {
            let key = row.key.trim();
            let name = if row.name.trim().is_empty() { key } else { row.name.as_str() };
            SportOption::new(key, name)
        })
        .collect();
    options.sort_by(|a, b| Language::Fr.collate(&a.display_name, &b.display_name));
    options
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
