use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LEGACY_FIELD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{-?\s*\.((?:Meta|Data|Extras)(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*-?\}\}").unwrap()
});

/// Rewrite old `{{.Meta.BaseURL}}`-style field references into Liquid
/// output tags (`{{ Meta.BaseURL }}`) so older layouts keep rendering
pub fn preprocess_legacy_fields(content: &str) -> String {
    LEGACY_FIELD_REGEX
        .replace_all(content, |caps: &Captures| {
            debug!("Rewriting legacy template field .{}", &caps[1]);
            format!("{{{{ {} }}}}", &caps[1])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_fields_become_liquid() {
        assert_eq!(
            preprocess_legacy_fields(r#"<a href="{{.Meta.BaseURL}}docs">{{ .Data.title }}</a>"#),
            r#"<a href="{{ Meta.BaseURL }}docs">{{ Data.title }}</a>"#
        );
    }

    #[test]
    fn test_liquid_syntax_untouched() {
        let input = "{{ Meta.BaseURL }} {{ Data.tag | upcase }} {{.Other}}";
        assert_eq!(preprocess_legacy_fields(input), input);
    }
}
