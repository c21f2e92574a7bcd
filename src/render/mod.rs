//! Markdown conversion for bot replies: HTML for display surfaces and plain
//! text for the clipboard. Results are memoized in an injected [`RenderCache`].

pub mod cache;

use std::sync::Arc;

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

pub use cache::{RenderCache, RenderFormat};

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

pub struct MarkdownRenderer {
    cache: RenderCache,
}

impl MarkdownRenderer {
    pub fn new(cache: RenderCache) -> Self {
        Self { cache }
    }

    pub fn render_to_html(&mut self, markdown: &str) -> Arc<str> {
        self.cache
            .get_or_insert_with(RenderFormat::Html, markdown, markdown_to_html)
    }

    pub fn to_plain_text(&mut self, markdown: &str) -> Arc<str> {
        self.cache
            .get_or_insert_with(RenderFormat::PlainText, markdown, markdown_to_plain_text)
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Strip markup, keeping text, code, and block boundaries as line breaks.
pub fn markdown_to_plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut list_depth = 0usize;

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                end_block(&mut out);
            }
            Event::Start(Tag::Item) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                out.push_str("- ");
            }
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::BlockQuote(_)) => {
                if list_depth == 0 {
                    end_block(&mut out);
                } else if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::CodeBlock) => end_block(&mut out),
            Event::Rule => end_block(&mut out),
            Event::End(TagEnd::TableCell) => out.push('\t'),
            Event::End(TagEnd::TableHead) | Event::End(TagEnd::TableRow) => {
                if out.ends_with('\t') {
                    out.pop();
                }
                out.push('\n');
            }
            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn end_block(out: &mut String) {
    while out.ends_with("\n\n\n") {
        out.pop();
    }
    if out.is_empty() {
        return;
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    if !out.ends_with("\n\n") {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown_to_html() {
        let html = markdown_to_html("# Title\n\nSome **bold** and `code`.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn renders_tables() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn plain_text_drops_markup() {
        let text = markdown_to_plain_text("# Title\n\nSome **bold** and `code`.");
        assert_eq!(text, "Title\n\nSome bold and code.");
    }

    #[test]
    fn plain_text_keeps_code_blocks_and_lists() {
        let md = "Steps:\n\n- one\n- two\n\n```rust\nfn main() {}\n```\n";
        let text = markdown_to_plain_text(md);
        assert_eq!(text, "Steps:\n\n- one\n- two\n\nfn main() {}");
    }

    #[test]
    fn plain_text_of_links_keeps_label() {
        assert_eq!(
            markdown_to_plain_text("See [the docs](https://example.org)."),
            "See the docs."
        );
    }

    #[test]
    fn renderer_memoizes_per_input() {
        let mut renderer = MarkdownRenderer::new(RenderCache::new(8));
        let first = renderer.render_to_html("*hi*");
        let second = renderer.render_to_html("*hi*");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(&*renderer.to_plain_text("*hi*"), "hi");
        assert_eq!(renderer.cache().hits(), 1);
        assert_eq!(renderer.cache().misses(), 2);
    }
}
