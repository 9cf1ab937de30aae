use axum::http::StatusCode;
use axum::response::Html;

use crate::analyzer::AnalysisResult;

const INDEX_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/index.html"));
const RESULT_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/result.html"));

pub fn index(error: Option<&str>) -> Html<String> {
    let banner = error
        .map(|msg| format!(r#"<p class="error" role="alert">{}</p>"#, escape_html(msg)))
        .unwrap_or_default();
    Html(fill(INDEX_TEMPLATE, &[("error", banner)]))
}

pub fn error(status: StatusCode, message: &str) -> (StatusCode, Html<String>) {
    (status, index(Some(message)))
}

pub fn result(transcript: &str, analysis: &AnalysisResult) -> (StatusCode, Html<String>) {
    let html = fill(
        RESULT_TEMPLATE,
        &[
            ("sentiment", escape_html(analysis.sentiment.as_str())),
            ("summary", escape_html(&analysis.summary)),
            ("transcript", escape_html(transcript)),
        ],
    );
    (StatusCode::OK, Html(html))
}

/// Substitutes `{{name}}` placeholders in a single pass; inserted values are never rescanned.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
