//! Markdown rendering for article and comment bodies.

use pulldown_cmark::{html, Options, Parser};

/// Render markdown source to an HTML fragment.
///
/// Raw HTML embedded in the source passes through unchanged; escaping
/// untrusted input is the template layer's job.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options);
    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    rendered
}
