use pulldown_cmark::{html, Event, Options, Parser};

/// Render CommonMark to an HTML fragment.
///
/// Tables and strikethrough are enabled. Raw HTML in the source is escaped
/// and shown as text rather than passed through.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
