use std::collections::HashMap;

use rust_decimal::Decimal;

use super::*;
use crate::products::{Category, Level, SportOption};
use crate::seed::SeedCatalog;

fn running_shoe() -> Product {
    Product {
        id: "p1".to_owned(),
        category: Category::Footwear,
        sports: vec!["RUNNING".to_owned()],
        levels: vec![Level::Beginner],
        name: "Chaussures running comfort run 500".to_owned(),
        description: String::new(),
        price: Decimal::new(5999, 2),
        images: vec![],
        stock_count: None,
    }
}

fn tennis_racket() -> Product {
    Product {
        id: "p2".to_owned(),
        category: Category::Equipment,
        sports: vec!["TENNIS".to_owned()],
        levels: vec![Level::Beginner, Level::Average],
        name: "Raquette tennis control spin 102".to_owned(),
        description: String::new(),
        price: Decimal::new(8999, 2),
        images: vec![],
        stock_count: None,
    }
}

fn pair() -> Vec<Product> {
    vec![running_shoe(), tennis_racket()]
}

fn labels() -> SportLabels {
    SportLabels::from_options(&[
        SportOption::new("RUNNING", "RUNNING"),
        SportOption::new("TENNIS", "TENNIS"),
    ])
}

fn ids(results: &[&Product]) -> Vec<String> {
    results.iter().map(|p| p.id.clone()).collect()
}

// -----------------------------------------------------------------------
// Reference scenarios
// -----------------------------------------------------------------------

#[test]
fn query_running_matches_only_the_running_shoe() {
    let products = pair();
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);
    let mut selection = FilterSelection::default();
    selection.set_query("running");

    assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["p1"]);
}

#[test]
fn price_desc_orders_most_expensive_first() {
    let products = pair();
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);
    let selection = FilterSelection::default().with_sort(SortMode::PriceDesc);

    assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["p2", "p1"]);
}

#[test]
fn min_price_excludes_cheaper_products() {
    let products = pair();
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);
    let mut selection = FilterSelection::default();
    selection.set_price_range(Decimal::from(60), Decimal::from(120));

    assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["p2"]);
}

#[test]
fn average_level_keeps_only_matching_products() {
    let products = pair();
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);
    let mut selection = FilterSelection::default();
    selection.toggle_level(Level::Average);

    assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["p2"]);
}

#[test]
fn relevance_without_query_equals_name_ascending() {
    let products = SeedCatalog::standard().products();
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);

    let relevance = search(&products, &FilterSelection::default(), &ctx);
    let by_name = search(
        &products,
        &FilterSelection::default().with_sort(SortMode::NameAsc),
        &ctx,
    );

    assert_eq!(ids(&relevance), ids(&by_name));
    assert_eq!(relevance[0].name, "Ballon football match team pro");
}

// -----------------------------------------------------------------------
// Properties over the seed catalog
// -----------------------------------------------------------------------

#[test]
fn results_are_a_subset_within_price_bounds() {
    let products = SeedCatalog::standard().products();
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);

    for (min, max) in [(0, 120), (20, 60), (45, 45), (100, 10)] {
        let mut selection = FilterSelection::default();
        selection.set_price_range(Decimal::from(min), Decimal::from(max));
        for p in search(&products, &selection, &ctx) {
            assert!(products.iter().any(|q| q == p));
            assert!(p.price >= selection.min_price() && p.price <= selection.max_price());
        }
    }
}

#[test]
fn price_asc_and_desc_are_reverses_without_ties() {
    let products = SeedCatalog::standard().products();
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);

    let asc = ids(&search(
        &products,
        &FilterSelection::default().with_sort(SortMode::PriceAsc),
        &ctx,
    ));
    let mut desc = ids(&search(
        &products,
        &FilterSelection::default().with_sort(SortMode::PriceDesc),
        &ctx,
    ));
    desc.reverse();

    assert_eq!(asc, desc);
}

#[test]
fn price_ties_keep_input_order() {
    let mut a = running_shoe();
    a.id = "a".to_owned();
    let mut b = tennis_racket();
    b.id = "b".to_owned();
    b.price = a.price;
    let products = vec![a, b];
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);

    for sort in [SortMode::PriceAsc, SortMode::PriceDesc] {
        let selection = FilterSelection::default().with_sort(sort);
        assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["a", "b"]);
    }
}

#[test]
fn duplicate_ids_are_returned_once() {
    let products = vec![running_shoe(), running_shoe(), tennis_racket()];
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);

    let results = search(&products, &FilterSelection::default(), &ctx);
    assert_eq!(results.len(), 2);
}

#[test]
fn level_without_products_yields_empty_result() {
    let products = vec![running_shoe()];
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);
    let mut selection = FilterSelection::default();
    selection.toggle_level(Level::Expert);

    assert!(search(&products, &selection, &ctx).is_empty());
}

// -----------------------------------------------------------------------
// Relevance ranking
// -----------------------------------------------------------------------

#[test]
fn name_prefix_outranks_description_match() {
    let mut described = tennis_racket();
    described.id = "described".to_owned();
    described.description = "Parfait pour le running du dimanche".to_owned();
    let products = vec![described, running_shoe()];
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);
    let mut selection = FilterSelection::default();
    selection.set_query("chaussures");

    let results = search(&products, &selection, &ctx);
    assert_eq!(ids(&results), vec!["p1"]);

    selection.set_query("run");
    let results = search(&products, &selection, &ctx);
    assert_eq!(ids(&results), vec!["p1", "described"]);
}

#[test]
fn relevance_ties_keep_input_order() {
    let mut zinc = running_shoe();
    zinc.id = "zinc".to_owned();
    zinc.name = "Gourde zinc".to_owned();
    let mut acier = tennis_racket();
    acier.id = "acier".to_owned();
    acier.name = "Gourde acier".to_owned();
    let products = vec![zinc, acier];
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);
    let mut selection = FilterSelection::default();
    selection.set_query("gourde");

    assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["zinc", "acier"]);
}

#[test]
fn score_adds_each_matching_signal() {
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);
    let mut product = running_shoe();
    product.name = "Running shoe".to_owned();
    product.description = "running".to_owned();

    let projection = Projection::new(&product, &ctx);
    // prefix 6 + description 2 + sport label 3
    assert_eq!(projection.score("running", &ctx.weights), 11);
    // contains 4 + description 2 + sport label 3
    assert_eq!(projection.score("unning", &ctx.weights), 9);
    // level label only
    assert_eq!(projection.score("debutant", &ctx.weights), 2);
}

#[test]
fn custom_weights_change_the_ranking() {
    let labels = labels();
    let weights = RelevanceWeights {
        name_prefix: 0,
        name_contains: 0,
        description: 10,
        sport: 0,
        level: 0,
    };
    let ctx = SearchContext::new(&labels, Language::Fr).with_weights(weights);
    let mut described = tennis_racket();
    described.description = "Aussi pour le running".to_owned();
    let products = vec![running_shoe(), described];
    let mut selection = FilterSelection::default();
    selection.set_query("running");

    assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["p2", "p1"]);
}

#[test]
fn relevance_weights_parse_from_list() {
    assert_eq!(
        RelevanceWeights::parse_list("6, 4, 2, 3, 2"),
        Some(RelevanceWeights::default())
    );
    assert_eq!(RelevanceWeights::parse_list("6,4,2"), None);
    assert_eq!(RelevanceWeights::parse_list("6,4,x,3,2"), None);
    assert_eq!(RelevanceWeights::default().max_score(), 13);
}

// -----------------------------------------------------------------------
// Displayed (translated) strings
// -----------------------------------------------------------------------

#[test]
fn query_matches_displayed_translation() {
    let translations: HashMap<&str, &str> =
        HashMap::from([("Raquette tennis control spin 102", "Tennis racket control spin 102")]);
    let display = |text: &str| {
        translations
            .get(text)
            .map_or_else(|| text.to_owned(), |t| (*t).to_owned())
    };
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::En).with_display(&display);
    let products = pair();
    let mut selection = FilterSelection::default();
    selection.set_query("racket");

    assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["p2"]);
}

#[test]
fn name_sort_uses_displayed_names() {
    let translations: HashMap<&str, &str> = HashMap::from([
        ("Chaussures running comfort run 500", "Running shoes comfort run 500"),
        ("Raquette tennis control spin 102", "Tennis racket control spin 102"),
    ]);
    let display = |text: &str| {
        translations
            .get(text)
            .map_or_else(|| text.to_owned(), |t| (*t).to_owned())
    };
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::En).with_display(&display);
    let products = vec![tennis_racket(), running_shoe()];
    let selection = FilterSelection::default().with_sort(SortMode::NameAsc);

    assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["p1", "p2"]);
}

#[test]
fn query_matches_category_label() {
    let products = pair();
    let labels = labels();
    let ctx = SearchContext::new(&labels, Language::Fr);
    let mut selection = FilterSelection::default();
    selection.set_query("materiel");

    assert_eq!(ids(&search(&products, &selection, &ctx)), vec!["p2"]);
}
