//! Filter selection <-> URL query string.
//!
//! Parameters, in canonical order: `q`, `sport`, `category`, `levels`
//! (comma separated), `minPrice`, `maxPrice`, `sort`. Defaults are omitted,
//! so the default selection serializes to the empty string.

use std::borrow::Cow;
use std::str::FromStr;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rust_decimal::Decimal;

use crate::filter::{FilterSelection, SortMode, ALL, PRICE_DOMAIN_MAX, PRICE_DOMAIN_MIN};
use crate::platform::History;
use crate::products::{Category, Level, SportOption};

/// Everything but unreserved characters is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const PARAM_QUERY: &str = "q";
const PARAM_SPORT: &str = "sport";
const PARAM_CATEGORY: &str = "category";
const PARAM_LEVELS: &str = "levels";
const PARAM_MIN_PRICE: &str = "minPrice";
const PARAM_MAX_PRICE: &str = "maxPrice";
const PARAM_SORT: &str = "sort";

fn decode(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Raw parameter values of interest, first occurrence wins.
#[derive(Default)]
struct RawParams {
    query: Option<String>,
    sport: Option<String>,
    category: Option<String>,
    levels: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    sort: Option<String>,
}

impl RawParams {
    fn parse(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.trim().trim_start_matches('?');
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let slot = match decode(name).as_str() {
                PARAM_QUERY => &mut params.query,
                PARAM_SPORT => &mut params.sport,
                PARAM_CATEGORY => &mut params.category,
                PARAM_LEVELS => &mut params.levels,
                PARAM_MIN_PRICE => &mut params.min_price,
                PARAM_MAX_PRICE => &mut params.max_price,
                PARAM_SORT => &mut params.sort,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(decode(value));
            }
        }
        params
    }
}

/// Canonical key of `raw` in `known`, ignoring case. Blank, `"ALL"` and
/// unknown keys give `None`.
pub(crate) fn parse_sport(raw: &str, known: &[SportOption]) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
        return None;
    }
    known
        .iter()
        .find(|option| option.key.eq_ignore_ascii_case(raw))
        .map(|option| option.key.clone())
}

fn parse_price(raw: Option<&str>, default: Decimal) -> Decimal {
    raw.and_then(|r| Decimal::from_str(r.trim()).ok())
        .unwrap_or(default)
}

/// Parses a query string into a selection.
///
/// Unknown or out-of-vocabulary values fall back to their defaults: a sport
/// must be one of `known_sports`, levels outside the vocabulary are dropped,
/// prices are clamped into the domain and swapped when inverted. A leading
/// `?` is accepted.
#[must_use]
pub fn parse_query_string(query: &str, known_sports: &[SportOption]) -> FilterSelection {
    let raw = RawParams::parse(query);
    let mut selection = FilterSelection::default();

    if let Some(q) = raw.query.as_deref() {
        selection.set_query(q);
    }
    selection.sport = raw
        .sport
        .as_deref()
        .and_then(|s| parse_sport(s, known_sports));
    selection.category = raw
        .category
        .as_deref()
        .and_then(|c| Category::from_str(c).ok());
    if let Some(levels) = raw.levels.as_deref() {
        selection.levels = levels
            .split(',')
            .filter_map(|l| Level::from_str(l).ok())
            .collect();
    }
    selection.set_price_range(
        parse_price(raw.min_price.as_deref(), PRICE_DOMAIN_MIN),
        parse_price(raw.max_price.as_deref(), PRICE_DOMAIN_MAX),
    );
    selection.sort = raw
        .sort
        .as_deref()
        .and_then(|s| SortMode::from_str(s).ok())
        .unwrap_or_default();

    selection
}

/// Serializes `selection` canonically, without a leading `?`.
#[must_use]
pub fn to_query_string(selection: &FilterSelection) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    if !selection.query().is_empty() {
        pairs.push((PARAM_QUERY, selection.query().to_owned()));
    }
    if let Some(sport) = &selection.sport {
        pairs.push((PARAM_SPORT, sport.clone()));
    }
    if let Some(category) = selection.category {
        pairs.push((PARAM_CATEGORY, category.key().to_owned()));
    }
    if !selection.levels.is_empty() {
        let levels: Vec<&str> = selection.levels.iter().map(|l| l.key()).collect();
        pairs.push((PARAM_LEVELS, levels.join(",")));
    }
    if selection.min_price() != PRICE_DOMAIN_MIN {
        pairs.push((PARAM_MIN_PRICE, selection.min_price().normalize().to_string()));
    }
    if selection.max_price() != PRICE_DOMAIN_MAX {
        pairs.push((PARAM_MAX_PRICE, selection.max_price().normalize().to_string()));
    }
    if selection.sort != SortMode::default() {
        pairs.push((PARAM_SORT, selection.sort.key().to_owned()));
    }

    pairs
        .iter()
        .map(|(name, value)| format!("{name}={}", encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Keeps a [`History`] entry in step with the selection.
#[derive(Debug)]
pub struct UrlSync<H> {
    history: H,
}

impl<H: History> UrlSync<H> {
    pub fn new(history: H) -> Self {
        Self { history }
    }

    /// Selection encoded in the current history entry.
    #[must_use]
    pub fn initial_selection(&self, known_sports: &[SportOption]) -> FilterSelection {
        parse_query_string(&self.history.current_query(), known_sports)
    }

    /// Replaces the history entry when the serialized selection differs from
    /// it. Returns whether a replacement happened.
    pub fn sync(&self, selection: &FilterSelection) -> bool {
        let next = to_query_string(selection);
        if next == self.history.current_query() {
            return false;
        }
        tracing::debug!(query = %next, "replacing history entry");
        self.history.replace_query(&next);
        true
    }

    #[must_use]
    pub fn history(&self) -> &H {
        &self.history
    }
}
