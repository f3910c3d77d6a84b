//! State of the products page: the current selection, whether the user has
//! taken control of the facets, and the URL it is mirrored into.

use std::borrow::Cow;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::filter::{FilterSelection, SortMode};
use crate::infer::infer_facets;
use crate::platform::History;
use crate::products::{Category, Level, Product, SportOption};
use crate::search::{search, SearchContext};
use crate::timer::Debouncer;
use crate::url_state::{parse_sport, to_query_string, UrlSync};

/// Owns the filter selection of one products page and keeps the URL in
/// step with every change.
///
/// Until a facet control is used (sport, category, level), typing a query
/// infers the facets from it. A page opened from a URL that already carries
/// facets starts with inference off. Inferred facets are left out of the URL
/// so a reload infers them again instead of treating them as explicit.
#[derive(Debug)]
pub struct BrowseSession<H> {
    selection: FilterSelection,
    explicit_filters: bool,
    sports: Vec<SportOption>,
    url: UrlSync<H>,
    price: Debouncer<(Decimal, Decimal)>,
}

impl<H: History> BrowseSession<H> {
    pub fn new(history: H, sports: Vec<SportOption>, price_debounce: Duration) -> Self {
        let url = UrlSync::new(history);
        let selection = url.initial_selection(&sports);
        let explicit_filters = selection.has_facet_filters();
        let mut session = Self {
            selection,
            explicit_filters,
            sports,
            url,
            price: Debouncer::new(price_debounce),
        };
        if !session.explicit_filters && !session.selection.query().is_empty() {
            session.infer();
        }
        session.sync();
        session
    }

    #[must_use]
    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    #[must_use]
    pub fn sports(&self) -> &[SportOption] {
        &self.sports
    }

    /// `true` once a facet was set by hand or came from the URL.
    #[must_use]
    pub fn has_explicit_filters(&self) -> bool {
        self.explicit_filters
    }

    /// Canonical query string of the current selection, without facets that
    /// were only inferred from the query.
    #[must_use]
    pub fn query_string(&self) -> String {
        to_query_string(&self.url_selection())
    }

    #[must_use]
    pub fn url(&self) -> &UrlSync<H> {
        &self.url
    }

    /// Replaces the sport vocabulary, e.g. once the sports endpoint answered.
    pub fn set_sports(&mut self, sports: Vec<SportOption>) {
        self.sports = sports;
    }

    pub fn set_query(&mut self, query: &str) {
        self.selection.set_query(query);
        if !self.explicit_filters {
            self.infer();
        }
        self.sync();
    }

    /// `None` selects every sport. The key is matched against the sport
    /// vocabulary ignoring case; an unknown key selects every sport, as it
    /// would when read back from the URL.
    pub fn select_sport(&mut self, sport: Option<String>) {
        self.explicit_filters = true;
        self.selection.sport = sport.and_then(|raw| parse_sport(&raw, &self.sports));
        self.sync();
    }

    /// `None` selects every category.
    pub fn select_category(&mut self, category: Option<Category>) {
        self.explicit_filters = true;
        self.selection.category = category;
        self.sync();
    }

    pub fn toggle_level(&mut self, level: Level) {
        self.explicit_filters = true;
        self.selection.toggle_level(level);
        self.sync();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.selection.sort = sort;
        self.sync();
    }

    /// Applies a price range at once, dropping any pending draft.
    pub fn set_price_range(&mut self, min: Decimal, max: Decimal) {
        self.price.cancel();
        self.selection.set_price_range(min, max);
        self.sync();
    }

    /// Records a price range while the slider moves. It is applied by
    /// [`Self::commit_ready_price`] or [`Self::settle_price`] once no newer
    /// draft arrived for the debounce delay.
    pub fn draft_price_range(&mut self, min: Decimal, max: Decimal) {
        self.price.push((min, max));
    }

    /// Applies the debounced price range if its delay has elapsed.
    pub fn commit_ready_price(&mut self) -> bool {
        match self.price.take_ready() {
            Some((min, max)) => {
                self.apply_price(min, max);
                true
            }
            None => false,
        }
    }

    /// Waits for the pending draft, if any, and applies it.
    pub async fn settle_price(&mut self) -> bool {
        match self.price.settled().await {
            Some((min, max)) => {
                self.apply_price(min, max);
                true
            }
            None => false,
        }
    }

    /// Back to the default selection with inference re-enabled.
    pub fn reset(&mut self) {
        self.price.cancel();
        self.selection.reset();
        self.explicit_filters = false;
        self.sync();
    }

    /// Products of `products` matching the current selection, in display
    /// order.
    #[must_use]
    pub fn results<'p>(&self, products: &'p [Product], ctx: &SearchContext<'_>) -> Vec<&'p Product> {
        search(products, &self.selection, ctx)
    }

    fn apply_price(&mut self, min: Decimal, max: Decimal) {
        self.selection.set_price_range(min, max);
        self.sync();
    }

    fn infer(&mut self) {
        infer_facets(self.selection.query(), &self.sports).apply_to(&mut self.selection);
    }

    fn url_selection(&self) -> Cow<'_, FilterSelection> {
        if self.explicit_filters || !self.selection.has_facet_filters() {
            return Cow::Borrowed(&self.selection);
        }
        let mut selection = self.selection.clone();
        selection.sport = None;
        selection.category = None;
        selection.levels.clear();
        Cow::Owned(selection)
    }

    fn sync(&self) {
        self.url.sync(&self.url_selection());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::platform::MemoryHistory;
    use crate::products::SportLabels;
    use crate::seed::SeedCatalog;
    use crate::text::Language;

    const DEBOUNCE: Duration = Duration::from_millis(20);

    fn session(initial: &str) -> (BrowseSession<Arc<MemoryHistory>>, Arc<MemoryHistory>) {
        let history = Arc::new(MemoryHistory::new(initial));
        let sports = SeedCatalog::standard().sport_options();
        (
            BrowseSession::new(Arc::clone(&history), sports, DEBOUNCE),
            history,
        )
    }

    #[test]
    fn query_infers_facets_and_updates_url() {
        let (mut browse, history) = session("");
        browse.set_query("raquette tennis expert");

        assert_eq!(browse.selection().sport.as_deref(), Some("TENNIS"));
        assert!(browse.selection().levels.contains(&Level::Expert));
        assert_eq!(history.current_query(), "q=raquette%20tennis%20expert");
    }

    #[test]
    fn inferred_facets_survive_a_reload() {
        let (browse, history) = session("?q=running");
        assert_eq!(browse.selection().sport.as_deref(), Some("RUNNING"));
        assert_eq!(history.current_query(), "q=running");

        let (reloaded, _) = session(&history.current_query());
        assert!(!reloaded.has_explicit_filters());
        assert_eq!(reloaded.selection(), browse.selection());
    }

    #[test]
    fn touching_a_facet_writes_inferred_ones_too() {
        let (mut browse, history) = session("");
        browse.set_query("yoga");
        browse.select_category(Some(Category::Equipment));
        assert_eq!(
            history.current_query(),
            "q=yoga&sport=YOGA&category=MATERIEL"
        );
    }

    #[test]
    fn sport_keys_are_canonicalized() {
        let (mut browse, history) = session("");
        browse.select_sport(Some("tennis".to_owned()));
        assert_eq!(browse.selection().sport.as_deref(), Some("TENNIS"));
        assert_eq!(history.current_query(), "sport=TENNIS");

        browse.select_sport(Some("CURLING".to_owned()));
        assert_eq!(browse.selection().sport, None);
        assert!(browse.has_explicit_filters());
        assert_eq!(
            crate::url_state::parse_query_string(&browse.query_string(), browse.sports()),
            *browse.selection()
        );
    }

    #[test]
    fn clearing_the_query_resets_inferred_facets() {
        let (mut browse, _) = session("");
        browse.set_query("yoga");
        assert_eq!(browse.selection().sport.as_deref(), Some("YOGA"));
        browse.set_query("");
        assert!(!browse.selection().has_facet_filters());
        assert_eq!(browse.query_string(), "");
    }

    #[test]
    fn explicit_filter_stops_inference() {
        let (mut browse, _) = session("");
        browse.select_category(Some(Category::Apparel));
        browse.set_query("tennis");
        assert_eq!(browse.selection().sport, None);
        assert_eq!(browse.selection().category, Some(Category::Apparel));
        assert!(browse.has_explicit_filters());
    }

    #[test]
    fn url_facets_disable_inference() {
        let (mut browse, _) = session("?sport=RUNNING");
        assert!(browse.has_explicit_filters());
        browse.set_query("tennis");
        assert_eq!(browse.selection().sport.as_deref(), Some("RUNNING"));
    }

    #[test]
    fn url_query_is_inferred_on_open() {
        let (browse, history) = session("q=velo");
        assert!(!browse.has_explicit_filters());
        assert_eq!(browse.selection().query(), "velo");
        assert_eq!(history.current_query(), "q=velo");
    }

    #[test]
    fn non_canonical_url_is_rewritten_on_open() {
        let (_, history) = session("?sort=price-asc&q=sac&utm=mail");
        assert_eq!(history.current_query(), "q=sac&sort=price-asc");
    }

    #[test]
    fn sort_change_replaces_history_once() {
        let (mut browse, history) = session("");
        browse.set_sort(SortMode::NameAsc);
        browse.set_sort(SortMode::NameAsc);
        assert_eq!(history.replacements(), 1);
    }

    #[test]
    fn reset_restores_defaults_and_inference() {
        let (mut browse, history) = session("sport=YOGA&sort=price-desc");
        browse.reset();
        assert_eq!(browse.selection(), &FilterSelection::default());
        assert!(!browse.has_explicit_filters());
        assert_eq!(history.current_query(), "");
    }

    #[test]
    fn results_follow_the_selection() {
        let (mut browse, _) = session("");
        browse.set_query("yoga");
        let products = SeedCatalog::standard().products();
        let labels = SportLabels::from_options(browse.sports());
        let ctx = SearchContext::new(&labels, Language::Fr);

        let results = browse.results(&products, &ctx);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|p| p.sports.contains(&"YOGA".to_owned())));
    }

    #[tokio::test]
    async fn price_drafts_are_debounced() {
        let (mut browse, history) = session("");
        browse.draft_price_range(Decimal::from(10), Decimal::from(100));
        browse.draft_price_range(Decimal::from(20), Decimal::from(90));
        assert!(!browse.commit_ready_price());
        assert!(browse.selection().has_default_price_range());

        assert!(browse.settle_price().await);
        assert_eq!(browse.selection().min_price(), Decimal::from(20));
        assert_eq!(history.current_query(), "minPrice=20&maxPrice=90");
    }

    #[tokio::test]
    async fn late_draft_replaces_an_elapsed_one() {
        let (mut browse, _) = session("");
        browse.draft_price_range(Decimal::from(10), Decimal::from(100));
        tokio::time::sleep(DEBOUNCE * 4).await;
        browse.draft_price_range(Decimal::from(30), Decimal::from(40));

        assert!(browse.settle_price().await);
        assert_eq!(browse.selection().min_price(), Decimal::from(30));
        assert_eq!(browse.selection().max_price(), Decimal::from(40));
    }

    #[tokio::test]
    async fn immediate_price_range_cancels_draft() {
        let (mut browse, _) = session("");
        browse.draft_price_range(Decimal::from(10), Decimal::from(100));
        browse.set_price_range(Decimal::from(30), Decimal::from(40));
        tokio::time::sleep(DEBOUNCE * 4).await;
        assert!(!browse.commit_ready_price());
        assert_eq!(browse.selection().min_price(), Decimal::from(30));
    }
}
