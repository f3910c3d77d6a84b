//! Plain-text views. Every function returns the text instead of printing it
//! so the layout can be tested; `t` maps a French source string to its
//! display form.

use std::fmt::Write as _;

use sportshop_core::{
    format_price, Availability, Language, Product, ProductDetails, SessionUser, SportLabels,
};

pub(crate) const NO_RESULTS: &str = "Aucun produit ne correspond a ta recherche.";
pub(crate) const SIGNED_OUT: &str = "Vous n'etes pas connecte. Connectez-vous avec `sportshop login`.";
pub(crate) const OFFLINE_DETAIL: &str = "Serveur injoignable, fiche du catalogue local.";

pub(crate) type Display<'a> = &'a dyn Fn(&str) -> String;

/// `"1 resultat sur 12"`, `"3 resultats sur 12"`.
pub(crate) fn result_count(shown: usize, total: usize) -> String {
    let plural = if shown > 1 { "s" } else { "" };
    format!("{shown} resultat{plural} sur {total}")
}

pub(crate) fn availability(availability: Availability) -> String {
    match availability {
        Availability::InStock(count) => format!("{count} en stock"),
        Availability::OutOfStock => "Rupture".to_owned(),
        Availability::Unknown => "Stock inconnu".to_owned(),
    }
}

fn level_list(product: &Product, t: Display<'_>) -> String {
    product
        .levels
        .iter()
        .map(|level| t(level.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn sport_list(product: &Product, labels: &SportLabels, t: Display<'_>) -> String {
    product
        .sports
        .iter()
        .map(|key| t(&labels.label(key)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per product.
pub(crate) fn product_line(product: &Product, labels: &SportLabels, t: Display<'_>) -> String {
    format!(
        "{id:<10} {name}  {price}  [{category} | {sports} | {levels}]  {stock}",
        id = product.id,
        name = t(&product.name),
        price = format_price(product.price),
        category = t(product.category.label()),
        sports = sport_list(product, labels, t),
        levels = level_list(product, t),
        stock = t(&availability(product.availability())),
    )
}

/// The products page: count line, then the products or the no-results
/// message.
pub(crate) fn product_list(
    results: &[&Product],
    total: usize,
    labels: &SportLabels,
    t: Display<'_>,
) -> String {
    let mut out = result_count(results.len(), total);
    out.push('\n');
    if results.is_empty() {
        out.push_str(&t(NO_RESULTS));
        out.push('\n');
        return out;
    }
    for product in results {
        out.push_str(&product_line(product, labels, t));
        out.push('\n');
    }
    out
}

pub(crate) fn stock_summary(availability: Availability) -> String {
    match availability {
        Availability::InStock(count) => format!("{count} article(s) disponible(s)"),
        Availability::OutOfStock => "Rupture de stock".to_owned(),
        Availability::Unknown => "Stock inconnu".to_owned(),
    }
}

pub(crate) fn delivery(days: u8) -> String {
    let plural = if days > 1 { "s" } else { "" };
    format!("Chez vous en {days} jour{plural}")
}

/// `46` tenths -> `"4,6"`.
fn rating(tenths: u8) -> String {
    format!("{},{}", tenths / 10, tenths % 10)
}

pub(crate) fn product_detail(
    product: &Product,
    details: Option<&ProductDetails>,
    labels: &SportLabels,
    t: Display<'_>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", t(&product.name));
    let _ = writeln!(
        out,
        "{} | {}",
        t(product.category.label()),
        format_price(product.price)
    );
    if !product.description.is_empty() {
        let _ = writeln!(out, "{}", t(&product.description));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Stock : {}", t(&stock_summary(product.availability())));
    let _ = writeln!(out, "Sports : {}", sport_list(product, labels, t));
    let _ = writeln!(out, "Niveaux : {}", level_list(product, t));
    if let Some(image) = product.card_image() {
        let _ = writeln!(out, "Image : {image}");
    }

    let Some(details) = details else {
        return out;
    };
    let _ = writeln!(
        out,
        "Note : {}/5 ({} avis)",
        rating(details.rating_tenths),
        details.review_count
    );
    let _ = writeln!(out, "Ref : {}", details.sku);
    let _ = writeln!(out, "Marque : {}", details.brand);
    let _ = writeln!(
        out,
        "Livraison estimee : {}",
        t(&delivery(details.delivery_days))
    );
    let _ = writeln!(out, "Garantie : {} mois", details.warranty_months);
    let _ = writeln!(out, "Points forts :");
    for feature in details.features {
        let _ = writeln!(out, "  - {}", t(feature));
    }
    let _ = writeln!(out, "Stock par magasin :");
    for (store, count) in &details.stock_by_store {
        let stock = if *count > 0 {
            Availability::InStock(*count)
        } else {
            Availability::OutOfStock
        };
        let _ = writeln!(out, "  - {store} : {}", t(&availability(stock)));
    }
    out
}

pub(crate) fn profile(user: Option<&SessionUser>) -> String {
    match user {
        None => SIGNED_OUT.to_owned(),
        Some(user) => match user.signed_in_at {
            Some(at) => format!(
                "Connecte en tant que {} depuis le {}",
                user.display_name,
                at.format("%d/%m/%Y %H:%M UTC")
            ),
            None => format!("Connecte en tant que {}", user.display_name),
        },
    }
}

pub(crate) fn language_changed(language: Language) -> String {
    match language {
        Language::Fr => "Langue d'affichage : francais".to_owned(),
        Language::En => "Display language: English".to_owned(),
    }
}
