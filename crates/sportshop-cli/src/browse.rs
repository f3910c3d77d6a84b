//! Products page handlers: listing, the sport vocabulary and share links.
//!
//! A products command replays the page: it opens a browse session on the
//! `--url` query string, applies each flag as the matching control would,
//! loads the catalog for the resulting facets and renders the search.

use sportshop_client::RefreshOutcome;
use sportshop_core::filter::ALL;
use sportshop_core::{
    BrowseSession, Category, Level, MemoryHistory, SearchContext, ShareNotice, SortMode,
    SportLabels, SportOption,
};

use crate::app::App;
use crate::clipboard::SystemClipboard;
use crate::render;
use crate::FilterArgs;

/// `"ALL"` (any case) and blank both mean "no restriction".
fn restriction(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(trimmed)
    }
}

/// Canonical key of a `--sport` value, `None` for ALL or blank.
///
/// # Errors
///
/// Returns an error when the key is not in the sport vocabulary.
fn sport_key(raw: &str, sports: &[SportOption]) -> anyhow::Result<Option<String>> {
    let Some(key) = restriction(raw) else {
        return Ok(None);
    };
    sports
        .iter()
        .find(|option| option.key.eq_ignore_ascii_case(key))
        .map(|option| Some(option.key.clone()))
        .ok_or_else(|| anyhow::anyhow!("unknown sport: {key} (see `sportshop sports`)"))
}

/// Opens a session on `args.url` and applies the remaining flags in page
/// order: query, facets, price, sort.
///
/// # Errors
///
/// Returns an error for an unknown sport, category, level or sort key.
pub(crate) fn open_session(
    app: &App,
    args: &FilterArgs,
) -> anyhow::Result<BrowseSession<MemoryHistory>> {
    let history = MemoryHistory::new(args.url.as_deref().unwrap_or_default());
    let mut session = BrowseSession::new(
        history,
        app.catalog.sports(),
        app.config.price_debounce(),
    );

    if let Some(query) = &args.query {
        session.set_query(query);
    }
    if let Some(sport) = &args.sport {
        let sport = sport_key(sport, session.sports())?;
        session.select_sport(sport);
    }
    if let Some(category) = &args.category {
        let category = restriction(category)
            .map(str::parse::<Category>)
            .transpose()?;
        session.select_category(category);
    }
    for raw in &args.levels {
        let level: Level = raw.parse()?;
        if !session.selection().levels.contains(&level) {
            session.toggle_level(level);
        }
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        let min = args.min_price.unwrap_or(session.selection().min_price());
        let max = args.max_price.unwrap_or(session.selection().max_price());
        session.set_price_range(min, max);
    }
    if let Some(sort) = &args.sort {
        session.set_sort(sort.parse::<SortMode>()?);
    }
    Ok(session)
}

/// Print the products matching the filters.
///
/// Sports are refreshed first so URL sport keys can be validated, then the
/// products for the selected sport and levels. A failed refresh leaves the
/// last known catalog (the seed on a cold start) in place.
///
/// # Errors
///
/// Returns an error if a flag value is invalid.
pub(crate) async fn run_products(app: &App, args: &FilterArgs) -> anyhow::Result<()> {
    app.catalog.refresh_sports().await;
    let session = open_session(app, args)?;
    let selection = session.selection();

    let sport = selection.sport.as_deref();
    match app.catalog.refresh_products(sport, &selection.levels).await {
        RefreshOutcome::Applied { count } => tracing::debug!(count, "catalog refreshed"),
        RefreshOutcome::Stale => {}
        RefreshOutcome::Failed(e) => {
            tracing::warn!(error = %e, "showing last known catalog");
            eprintln!("{}", app.t(&e.user_message()));
        }
    }

    let products = app.catalog.products();
    let labels = SportLabels::from_options(session.sports());

    let mut texts: Vec<String> = products
        .iter()
        .flat_map(|p| [p.name.clone(), p.description.clone()])
        .collect();
    texts.extend(session.sports().iter().map(|s| s.display_name.clone()));
    texts.extend(Category::ALL.iter().map(|c| c.label().to_owned()));
    texts.extend(Level::ALL.iter().map(|l| l.label().to_owned()));
    texts.extend(products.iter().map(|p| render::availability(p.availability())));
    texts.push(render::NO_RESULTS.to_owned());
    app.prime(texts.iter().map(String::as_str)).await;

    let display = |text: &str| app.t(text);
    let ctx = SearchContext::new(&labels, app.overlay.language())
        .with_display(&display)
        .with_weights(app.config.relevance_weights);
    let results = session.results(&products, &ctx);

    print!(
        "{}",
        render::product_list(&results, app.catalog.total_count(), &labels, &display)
    );
    println!("?{}", session.query_string());
    Ok(())
}

/// Print the sport vocabulary as `KEY  Display name`.
pub(crate) async fn run_sports(app: &App) {
    if !app.catalog.refresh_sports().await {
        tracing::warn!("sports unavailable, showing the local list");
    }
    let sports = app.catalog.sports();
    app.prime(sports.iter().map(|s| s.display_name.as_str())).await;
    for sport in &sports {
        println!("{:<12} {}", sport.key, app.t(&sport.display_name));
    }
}

/// Print the canonical link of a selection and try to copy it.
///
/// # Errors
///
/// Returns an error if a flag value is invalid. A missing clipboard is
/// reported, not an error.
pub(crate) async fn run_share(app: &App, args: &FilterArgs) -> anyhow::Result<()> {
    app.catalog.refresh_sports().await;
    let session = open_session(app, args)?;
    let link = share_link(&session.query_string());

    let mut notice = ShareNotice::new(app.config.notice_dismiss());
    let feedback = notice.copy_link(&SystemClipboard, &link);
    app.prime([feedback.message()]).await;
    println!("{link}");
    println!("{}", app.t(feedback.message()));
    Ok(())
}

/// Storefront path of the products page for `query`; the default
/// selection has no query string.
pub(crate) fn share_link(query: &str) -> String {
    if query.is_empty() {
        "/products".to_owned()
    } else {
        format!("/products?{query}")
    }
}
