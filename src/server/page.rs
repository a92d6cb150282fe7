//! The single HTML page: upload form plus an optional result region.

use crate::error::escape_html;

const PAGE_TEMPLATE: &str = include_str!("../../assets/index.html");

/// Placeholder in the template replaced by the result region.
const RESULT_MARKER: &str = "<!-- recurio:result -->";

/// Render the page.
///
/// `result_html` is inserted **unescaped**: it is either the model's
/// `<ol>` list or an error fragment already built by this crate.
/// `None` renders the empty form.
pub fn render_page(result_html: Option<&str>) -> String {
    match result_html {
        None => PAGE_TEMPLATE.replacen(RESULT_MARKER, "", 1),
        Some(html) => PAGE_TEMPLATE.replacen(RESULT_MARKER, &result_region(html), 1),
    }
}

/// Render the page with a plain-text message in the result region.
pub fn render_error_page(message: &str) -> String {
    let fragment = format!("<p>{}</p>", escape_html(message));
    render_page(Some(&fragment))
}

fn result_region(html: &str) -> String {
    format!(
        r#"<h3 class="result-title">✅Scan Completed. Here is your Result.</h3>
      <div class="RESPONSE">{html}</div>
      <div class="toolbar">
        <button class="toolButton" onclick="copyQuestions()">Copy</button>
        <button class="toolButton" onclick="clearResults()">Clear</button>
      </div>"#
    )
}
