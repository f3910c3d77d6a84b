//! Facet inference from the free-text query: typing "chaussures running
//! débutant" selects the running sport, the footwear category and the
//! beginner level.

use std::collections::BTreeSet;

use crate::filter::FilterSelection;
use crate::products::{Category, Level, SportOption};
use crate::text::normalize_search_text;

/// Facets recognised in a query. All-default for a blank query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredFacets {
    pub sport: Option<String>,
    pub category: Option<Category>,
    pub levels: BTreeSet<Level>,
}

impl InferredFacets {
    /// Overwrites the facet fields of `selection`. Query, price and sort are
    /// left alone.
    pub fn apply_to(self, selection: &mut FilterSelection) {
        selection.sport = self.sport;
        selection.category = self.category;
        selection.levels = self.levels;
    }
}

fn mentions(haystack: &str, needle: &str) -> bool {
    let needle = normalize_search_text(needle);
    !needle.is_empty() && haystack.contains(&needle)
}

/// Matches the query against sport keys and names, category keys and labels,
/// level keys and labels, ignoring case and accents.
///
/// The first matching sport (in `sports` order) and the first matching
/// category (alphabetical by key) win; every matching level is kept.
#[must_use]
pub fn infer_facets(query: &str, sports: &[SportOption]) -> InferredFacets {
    let text = normalize_search_text(query);
    if text.is_empty() {
        return InferredFacets::default();
    }

    let sport = sports
        .iter()
        .find(|s| mentions(&text, &s.key) || mentions(&text, &s.display_name))
        .map(|s| s.key.clone());

    let mut categories = Category::ALL;
    categories.sort_by_key(|c| c.key());
    let category = categories
        .into_iter()
        .find(|c| mentions(&text, c.key()) || mentions(&text, c.label()));

    let levels = Level::ALL
        .into_iter()
        .filter(|l| mentions(&text, l.key()) || mentions(&text, l.label()))
        .collect();

    InferredFacets {
        sport,
        category,
        levels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedCatalog;

    fn sports() -> Vec<SportOption> {
        SeedCatalog::standard().sport_options()
    }

    #[test]
    fn blank_query_infers_nothing() {
        assert_eq!(infer_facets("   ", &sports()), InferredFacets::default());
    }

    #[test]
    fn accented_query_matches_plain_labels() {
        let facets = infer_facets("Chaussures RUNNING débutant", &sports());
        assert_eq!(facets.sport.as_deref(), Some("RUNNING"));
        assert_eq!(facets.category, Some(Category::Footwear));
        assert_eq!(
            facets.levels.into_iter().collect::<Vec<_>>(),
            vec![Level::Beginner]
        );
    }

    #[test]
    fn level_keys_and_labels_both_match() {
        let facets = infer_facets("expert intermédiaire", &sports());
        assert_eq!(
            facets.levels.into_iter().collect::<Vec<_>>(),
            vec![Level::Average, Level::Expert]
        );
    }

    #[test]
    fn accented_category_label_maps_to_equipment() {
        let facets = infer_facets("matériel de yoga", &sports());
        assert_eq!(facets.category, Some(Category::Equipment));
        assert_eq!(facets.sport.as_deref(), Some("YOGA"));
    }

    #[test]
    fn unrelated_query_infers_nothing() {
        let facets = infer_facets("cadeau", &sports());
        assert_eq!(facets, InferredFacets::default());
    }

    #[test]
    fn apply_to_keeps_query_and_sort() {
        let mut selection = FilterSelection::default();
        selection.set_query("tennis");
        selection.sort = crate::filter::SortMode::PriceAsc;
        infer_facets(selection.query(), &sports()).apply_to(&mut selection);
        assert_eq!(selection.sport.as_deref(), Some("TENNIS"));
        assert_eq!(selection.query(), "tennis");
        assert_eq!(selection.sort, crate::filter::SortMode::PriceAsc);
    }
}
