//! Static page shown in place of a page that failed to load.

const TEMPLATE: &str = include_str!("../../resources/pages/load_error.html");

/// Renders the error page for `failed_url`, styled by the `:root` block
/// from the theme engine. `token` signs the button messages.
pub fn render(failed_url: &str, theme_css: &str, token: &str) -> String {
    let token = serde_json::to_string(token).unwrap_or_else(|_| "\"\"".to_string());
    TEMPLATE
        .replace("{{TOKEN}}", &token)
        .replace("{{THEME}}", theme_css)
        .replace("{{URL}}", &escape_html(failed_url))
}

/// Escapes text for an HTML element or attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
