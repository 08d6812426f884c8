use once_cell::sync::Lazy;
use regex::Regex;

/// Old-style base URL placeholder some sites still put in front of links
pub const LEGACY_BASE_URL_PREFIX: &str = "{{.Meta.BaseURL}}";

static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

/// Outcome of looking at one link destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRewrite {
    Unchanged,
    Rewritten(String),
    /// Rewritten from the legacy placeholder prefix
    Legacy(String),
}

/// Rewrite a Markdown link destination against the site's base URL.
///
/// Links with a scheme, fragments and page-relative links stay as they are.
/// Root links (`/docs/x`) and links using the legacy placeholder are joined
/// onto `base_url`.
pub fn rewrite_link(url: &str, base_url: &str) -> LinkRewrite {
    if url.is_empty() || url.starts_with('#') {
        return LinkRewrite::Unchanged;
    }

    if let Some(rest) = url.strip_prefix(LEGACY_BASE_URL_PREFIX) {
        return LinkRewrite::Legacy(join_url(base_url, rest));
    }

    if SCHEME_REGEX.is_match(url) || url.starts_with("//") {
        return LinkRewrite::Unchanged;
    }

    if url.starts_with('/') {
        return LinkRewrite::Rewritten(join_url(base_url, url));
    }

    LinkRewrite::Unchanged
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
