use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::warnings::{Deprecation, DeprecationWarnings};

/// Placeholder used by layouts written before slots existed
pub const LEGACY_CONTENT_TOKEN: &str = "{{.Content}}";

static SELF_CLOSING_SLOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<slot\s*/>").unwrap());
static OPENING_SLOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<slot\s*>").unwrap());
static CLOSING_SLOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"</slot\s*>").unwrap());

/// Put `replacement` into the layout's slot.
///
/// A legacy `{{.Content}}` token wins over slot markers and only its first
/// occurrence is replaced. Otherwise the earliest `<slot/>` or
/// `<slot>...</slot>` pair is replaced, markers included. A layout with no
/// marker comes back unchanged.
pub fn inject_in_slot(layout: &str, replacement: &str, warnings: &DeprecationWarnings) -> String {
    if layout.contains(LEGACY_CONTENT_TOKEN) {
        warnings.warn_once(Deprecation::ContentToken);
        return layout.replacen(LEGACY_CONTENT_TOKEN, replacement, 1);
    }

    let self_closing = SELF_CLOSING_SLOT.find(layout);
    let opening = OPENING_SLOT.find(layout);

    let (start, end) = match (self_closing, opening) {
        (Some(marker), Some(open)) if marker.start() < open.start() => (marker.start(), marker.end()),
        (Some(marker), None) => (marker.start(), marker.end()),
        (_, Some(open)) => match CLOSING_SLOT.find_at(layout, open.end()) {
            Some(close) => (open.start(), close.end()),
            None => (open.start(), open.end()),
        },
        (None, None) => return layout.to_string(),
    };

    let mut output = String::with_capacity(layout.len() + replacement.len());
    output.push_str(&layout[..start]);
    output.push_str(replacement);
    output.push_str(&layout[end..]);
    output
}
