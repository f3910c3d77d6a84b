use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::products::{Category, Level};
use crate::CoreError;

/// Lower bound of the price filter domain, in EUR.
pub const PRICE_DOMAIN_MIN: Decimal = Decimal::ZERO;
/// Upper bound of the price filter domain, in EUR.
pub const PRICE_DOMAIN_MAX: Decimal = Decimal::from_parts(120, 0, 0, false, 0);

/// Wildcard value of the sport and category selectors.
pub const ALL: &str = "ALL";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Relevance,
        SortMode::PriceAsc,
        SortMode::PriceDesc,
        SortMode::NameAsc,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::PriceAsc => "price-asc",
            SortMode::PriceDesc => "price-desc",
            SortMode::NameAsc => "name-asc",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortMode::Relevance => "Pertinence",
            SortMode::PriceAsc => "Prix croissant",
            SortMode::PriceDesc => "Prix decroissant",
            SortMode::NameAsc => "Nom A-Z",
        }
    }
}

impl FromStr for SortMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|m| m.key() == s.trim())
            .ok_or_else(|| CoreError::UnknownSortMode(s.to_owned()))
    }
}

/// The user's current combination of query, filters and sort.
///
/// `sport == None` and `category == None` mean "ALL". An empty `levels` set
/// means no level restriction. Prices always lie in
/// [`PRICE_DOMAIN_MIN`, `PRICE_DOMAIN_MAX`] with `min_price <= max_price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    query: String,
    pub sport: Option<String>,
    pub category: Option<Category>,
    pub levels: BTreeSet<Level>,
    min_price: Decimal,
    max_price: Decimal,
    pub sort: SortMode,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            query: String::new(),
            sport: None,
            category: None,
            levels: BTreeSet::new(),
            min_price: PRICE_DOMAIN_MIN,
            max_price: PRICE_DOMAIN_MAX,
            sort: SortMode::Relevance,
        }
    }
}

impl FilterSelection {
    #[must_use]
    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// The free-text query, already trimmed.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        query.trim().clone_into(&mut self.query);
    }

    #[must_use]
    pub fn min_price(&self) -> Decimal {
        self.min_price
    }

    #[must_use]
    pub fn max_price(&self) -> Decimal {
        self.max_price
    }

    /// Sets both price bounds, clamping each into the domain and swapping
    /// them when inverted. A range entirely outside the domain collapses onto
    /// the nearest boundary.
    pub fn set_price_range(&mut self, min: Decimal, max: Decimal) {
        let (min, max) = clamp_price_range(min, max);
        self.min_price = min;
        self.max_price = max;
    }

    /// Adds `level` when absent, removes it otherwise.
    pub fn toggle_level(&mut self, level: Level) {
        if !self.levels.remove(&level) {
            self.levels.insert(level);
        }
    }

    /// Sport key for display and URLs, `"ALL"` when unrestricted.
    #[must_use]
    pub fn sport_key(&self) -> &str {
        self.sport.as_deref().unwrap_or(ALL)
    }

    /// Category key for display and URLs, `"ALL"` when unrestricted.
    #[must_use]
    pub fn category_key(&self) -> &str {
        self.category.map_or(ALL, Category::key)
    }

    /// `true` when sport, category or levels carry a restriction. Query,
    /// price and sort do not count.
    #[must_use]
    pub fn has_facet_filters(&self) -> bool {
        self.sport.is_some() || self.category.is_some() || !self.levels.is_empty()
    }

    /// `true` when the price bounds are the full domain.
    #[must_use]
    pub fn has_default_price_range(&self) -> bool {
        self.min_price == PRICE_DOMAIN_MIN && self.max_price == PRICE_DOMAIN_MAX
    }

    /// Restores every field to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Clamps a price pair into the domain and orders it.
#[must_use]
pub fn clamp_price_range(min: Decimal, max: Decimal) -> (Decimal, Decimal) {
    let min = min.clamp(PRICE_DOMAIN_MIN, PRICE_DOMAIN_MAX);
    let max = max.clamp(PRICE_DOMAIN_MIN, PRICE_DOMAIN_MAX);
    if min > max {
        (max, min)
    } else {
        (min, max)
    }
}
