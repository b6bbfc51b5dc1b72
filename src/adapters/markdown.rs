//! CommonMark rendering via `pulldown-cmark`.

use pulldown_cmark::{html, Options, Parser};

use super::MarkdownRenderer;

/// CommonMark renderer with the common GitHub extensions enabled
#[derive(Debug, Clone, Copy)]
pub struct CommonMarkRenderer {
    options: Options,
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommonMarkRenderer {
    /// Tables, strikethrough and task lists on
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }

    /// Plain CommonMark, no extensions
    pub fn strict() -> Self {
        Self {
            options: Options::empty(),
        }
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
