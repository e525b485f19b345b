use pulldown_cmark::{Options, Parser, html};

/// Render markdown to an HTML fragment.
///
/// GFM-flavored: tables, strikethrough, task lists, and footnotes are
/// enabled. Newlines are NOT treated as hard breaks. Pure and synchronous;
/// no tenant or database dependency.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(content, options);

    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render_markdown("hello *world*"), "<p>hello <em>world</em></p>\n");
    }

    #[test]
    fn test_gfm_table() {
        let out = render_markdown("| a | b |\n| - | - |\n| 1 | 2 |");
        assert!(out.contains("<table>"));
    }

    #[test]
    fn test_strikethrough() {
        assert!(render_markdown("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn test_newline_is_not_a_hard_break() {
        let out = render_markdown("line one\nline two");
        assert!(!out.contains("<br"));
    }

    #[test]
    fn test_markdown_link() {
        let out = render_markdown("[About](/about)");
        assert!(out.contains(r#"<a href="/about">About</a>"#));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render_markdown(""), "");
    }
}
