use comrak::nodes::NodeValue;
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{Arena, Options, Plugins};

use crate::utils::error::Result;

/// GitHub Flavored Markdown options with footnotes, heading ids and raw HTML
pub fn create_comrak_options(hard_wrap: bool) -> Options<'static> {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.header_ids = Some(String::new());

    options.render.hardbreaks = hard_wrap;
    options.render.github_pre_lang = true;
    options.render.unsafe_ = true;

    options
}

/// Syntect based code block highlighter using the named theme
pub fn create_highlighter(theme: &str) -> SyntectAdapter {
    SyntectAdapter::new(Some(theme))
}

/// Render Markdown to HTML.
///
/// `rewrite` is offered every link destination in the document and may
/// return a replacement.
pub fn render_markdown<F>(
    content: &str,
    options: &Options,
    highlighter: Option<&SyntectAdapter>,
    mut rewrite: F,
) -> Result<String>
where
    F: FnMut(&str) -> Option<String>,
{
    let arena = Arena::new();
    let root = comrak::parse_document(&arena, content, options);

    for node in root.descendants() {
        if let NodeValue::Link(ref mut link) = node.data.borrow_mut().value {
            if let Some(url) = rewrite(&link.url) {
                link.url = url;
            }
        }
    }

    let mut plugins = Plugins::default();
    if let Some(adapter) = highlighter {
        plugins.render.codefence_syntax_highlighter = Some(adapter);
    }

    let mut html = Vec::new();
    comrak::format_html_with_plugins(root, options, &mut html, &plugins)?;

    Ok(String::from_utf8_lossy(&html).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        render_markdown(markdown, &create_comrak_options(false), None, |_| None).unwrap()
    }

    #[test]
    fn test_comrak_rendering() {
        let html = render("# Hello, World!\n\nThis is a **bold** statement.");

        assert!(html.contains("Hello, World!</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_raw_html_is_kept() {
        let html = render("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    #[test]
    fn test_hard_wrap() {
        let soft = render("one\ntwo");
        let hard =
            render_markdown("one\ntwo", &create_comrak_options(true), None, |_| None).unwrap();

        assert!(!soft.contains("<br"));
        assert!(hard.contains("<br"));
    }

    #[test]
    fn test_links_pass_through_rewriter() {
        let html = render_markdown(
            "[docs](/docs/intro) and [site](https://example.com)",
            &create_comrak_options(false),
            None,
            |url| url.starts_with('/').then(|| format!("/base{}", url)),
        )
        .unwrap();

        assert!(html.contains("href=\"/base/docs/intro\""));
        assert!(html.contains("href=\"https://example.com\""));
    }

    #[test]
    fn test_highlighted_code_block() {
        let adapter = create_highlighter("base16-ocean.dark");
        let html = render_markdown(
            "```rust\nfn main() {}\n```\n",
            &create_comrak_options(false),
            Some(&adapter),
            |_| None,
        )
        .unwrap();

        assert!(html.contains("<pre"));
        assert!(html.contains("style="));
    }
}
