//! Filtering, sorting and relevance ranking of the product working set.
//!
//! [`search`] is pure and synchronous: the same products, selection and
//! display context always give the same order. Results borrow from the
//! input slice so a product can never be fabricated along the way.

use std::collections::HashSet;

use crate::filter::{FilterSelection, SortMode};
use crate::products::{Product, SportLabels};
use crate::text::Language;

/// Additive relevance weights for a non-empty query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceWeights {
    /// Name starts with the query.
    pub name_prefix: u32,
    /// Name contains the query (only when it does not start with it).
    pub name_contains: u32,
    pub description: u32,
    /// Any displayed sport label contains the query.
    pub sport: u32,
    /// Any displayed level label contains the query.
    pub level: u32,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            name_prefix: 6,
            name_contains: 4,
            description: 2,
            sport: 3,
            level: 2,
        }
    }
}

impl RelevanceWeights {
    /// Parses `"name_prefix,name_contains,description,sport,level"`, e.g.
    /// `"6,4,2,3,2"`. Returns `None` unless there are exactly five integers.
    #[must_use]
    pub fn parse_list(raw: &str) -> Option<Self> {
        let values = raw
            .split(',')
            .map(|part| part.trim().parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()?;
        match values.as_slice() {
            &[name_prefix, name_contains, description, sport, level] => Some(Self {
                name_prefix,
                name_contains,
                description,
                sport,
                level,
            }),
            _ => None,
        }
    }

    /// Highest score a product can reach.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.name_prefix.max(self.name_contains) + self.description + self.sport + self.level
    }
}

fn source_text(text: &str) -> String {
    text.to_owned()
}

/// Everything the engine needs besides products and selection: how sport
/// keys are labelled, how source strings are displayed, and which language
/// drives name collation.
pub struct SearchContext<'a> {
    pub sport_labels: &'a SportLabels,
    pub language: Language,
    pub weights: RelevanceWeights,
    display: &'a dyn Fn(&str) -> String,
}

impl<'a> SearchContext<'a> {
    /// Context that displays source strings as-is.
    #[must_use]
    pub fn new(sport_labels: &'a SportLabels, language: Language) -> Self {
        Self {
            sport_labels,
            language,
            weights: RelevanceWeights::default(),
            display: &source_text,
        }
    }

    /// Routes every displayed string through `display` (the translation
    /// overlay in practice).
    #[must_use]
    pub fn with_display(mut self, display: &'a dyn Fn(&str) -> String) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: RelevanceWeights) -> Self {
        self.weights = weights;
        self
    }

    fn display(&self, text: &str) -> String {
        (self.display)(text)
    }
}

/// Strings of one product in source and displayed form, lower-cased for
/// matching except `display_name`, which is kept for collation.
struct Projection {
    display_name: String,
    names: [String; 2],
    descriptions: [String; 2],
    sport_labels: Vec<String>,
    level_labels: Vec<String>,
    haystack: String,
}

impl Projection {
    fn new(product: &Product, ctx: &SearchContext<'_>) -> Self {
        let display_name = ctx.display(&product.name);
        let display_description = ctx.display(&product.description);
        let category_label = product.category.label();

        let source_sport_labels: Vec<String> = product
            .sports
            .iter()
            .map(|key| ctx.sport_labels.label(key))
            .collect();
        let sport_labels: Vec<String> = source_sport_labels
            .iter()
            .map(|label| ctx.display(label))
            .collect();
        let level_labels: Vec<String> = product
            .levels
            .iter()
            .map(|level| ctx.display(level.label()))
            .collect();

        let mut parts: Vec<String> = vec![
            product.name.clone(),
            display_name.clone(),
            product.description.clone(),
            display_description.clone(),
            product.category.key().to_owned(),
            category_label.to_owned(),
            ctx.display(category_label),
        ];
        parts.extend(product.sports.iter().cloned());
        parts.extend(source_sport_labels);
        parts.extend(sport_labels.iter().cloned());
        parts.extend(product.levels.iter().map(|l| l.key().to_owned()));
        parts.extend(product.levels.iter().map(|l| l.label().to_owned()));
        parts.extend(level_labels.iter().cloned());

        Self {
            names: [product.name.to_lowercase(), display_name.to_lowercase()],
            descriptions: [
                product.description.to_lowercase(),
                display_description.to_lowercase(),
            ],
            sport_labels: sport_labels.iter().map(|s| s.to_lowercase()).collect(),
            level_labels: level_labels.iter().map(|s| s.to_lowercase()).collect(),
            haystack: parts.join(" ").to_lowercase(),
            display_name,
        }
    }

    fn score(&self, query: &str, weights: &RelevanceWeights) -> u32 {
        let mut score = 0;

        if self.names.iter().any(|n| n.starts_with(query)) {
            score += weights.name_prefix;
        } else if self.names.iter().any(|n| n.contains(query)) {
            score += weights.name_contains;
        }

        if self.descriptions.iter().any(|d| d.contains(query)) {
            score += weights.description;
        }

        if self.sport_labels.iter().any(|s| s.contains(query)) {
            score += weights.sport;
        }

        if self.level_labels.iter().any(|l| l.contains(query)) {
            score += weights.level;
        }

        score
    }
}

fn passes_facets(product: &Product, selection: &FilterSelection) -> bool {
    let sport_ok = selection
        .sport
        .as_ref()
        .is_none_or(|sport| product.sports.contains(sport));
    let category_ok = selection.category.is_none_or(|c| c == product.category);
    let level_ok = selection.levels.is_empty()
        || product.levels.iter().any(|l| selection.levels.contains(l));
    let price_ok = product.price >= selection.min_price() && product.price <= selection.max_price();

    sport_ok && category_ok && level_ok && price_ok
}

/// Filters and orders `products` for `selection`.
///
/// Duplicate ids keep their first occurrence. An empty result is a normal
/// outcome (the "no results" state), never an error.
#[must_use]
pub fn search<'p>(
    products: &'p [Product],
    selection: &FilterSelection,
    ctx: &SearchContext<'_>,
) -> Vec<&'p Product> {
    let query = selection.query().to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut hits: Vec<(&'p Product, Projection)> = Vec::new();

    for product in products {
        if !seen.insert(product.id.as_str()) || !passes_facets(product, selection) {
            continue;
        }
        let projection = Projection::new(product, ctx);
        if !query.is_empty() && !projection.haystack.contains(query.as_str()) {
            continue;
        }
        hits.push((product, projection));
    }

    let by_name =
        |a: &Projection, b: &Projection| ctx.language.collate(&a.display_name, &b.display_name);

    match selection.sort {
        SortMode::PriceAsc => hits.sort_by(|(a, _), (b, _)| a.price.cmp(&b.price)),
        SortMode::PriceDesc => hits.sort_by(|(a, _), (b, _)| b.price.cmp(&a.price)),
        SortMode::NameAsc => hits.sort_by(|(_, a), (_, b)| by_name(a, b)),
        SortMode::Relevance if query.is_empty() => hits.sort_by(|(_, a), (_, b)| by_name(a, b)),
        SortMode::Relevance => {
            let mut scored: Vec<(u32, &'p Product)> = hits
                .iter()
                .map(|(p, proj)| (proj.score(&query, &ctx.weights), *p))
                .collect();
            scored.sort_by(|(a, _), (b, _)| b.cmp(a));
            return scored.into_iter().map(|(_, p)| p).collect();
        }
    }

    hits.into_iter().map(|(p, _)| p).collect()
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
