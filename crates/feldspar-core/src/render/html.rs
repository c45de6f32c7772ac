//! HTML fragment assembly.

use crate::format::escape_html;

use super::record::RenderedRecord;

/// Renders a record as a definition-list fragment.
///
/// The fragment is meant to be injected into a host page container and
/// carries no document scaffolding of its own. Labels and field names are
/// escaped here; row values arrive already HTML-safe from the formatter.
pub fn fragment(record: &RenderedRecord) -> String {
    let mut out = String::new();
    out.push_str("<dl class=\"feldspar-record\">\n");
    for row in &record.rows {
        out.push_str("  <dt class=\"feldspar-label\">");
        out.push_str(&escape_html(&row.label));
        out.push_str("</dt>\n");
        out.push_str("  <dd class=\"feldspar-value\" data-field=\"");
        out.push_str(&escape_html(&row.name));
        out.push_str("\">");
        out.push_str(&row.html);
        out.push_str("</dd>\n");
    }
    out.push_str("</dl>\n");
    out
}
