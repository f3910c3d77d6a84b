//! HTML entity decoding for provider output.

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, unescape_with};

/// Decodes named and numeric HTML entities. Text that is not valid escaped
/// markup (a bare `&`, an unknown entity) is returned unchanged.
#[must_use]
pub fn decode_html_entities(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }
    match unescape_with(value, resolve_html5_entity) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!(error = %e, "leaving translation with stray entity as-is");
            Cow::Borrowed(value)
        }
    }
}
