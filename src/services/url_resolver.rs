//! Address bar resolution: what the user typed → what the engine loads, and
//! what the engine loaded → what the address bar shows.

use url::Url;

use crate::types::errors::NavigationError;

/// Outcome of resolving address-bar input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Blank input; nothing to do.
    Empty,
    /// A URL to hand to the engine.
    Url(String),
}

/// Turns address-bar text into a URL.
///
/// Text containing a space, or without any dot, is a search query sent to
/// `search_url` as its `q` parameter. Anything else is treated as an address
/// and gets `https://` when it lacks an http(s) scheme.
pub fn resolve_input(input: &str, search_url: &str) -> Result<Resolved, NavigationError> {
    let text = input.trim();
    if text.is_empty() {
        return Ok(Resolved::Empty);
    }

    if text.contains(' ') || !text.contains('.') {
        let mut url = Url::parse(search_url)
            .map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", search_url, e)))?;
        url.query_pairs_mut().append_pair("q", text);
        return Ok(Resolved::Url(url.into()));
    }

    let candidate = if has_http_scheme(text) {
        text.to_string()
    } else {
        format!("https://{}", text)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", text, e)))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(NavigationError::InvalidUrl(text.to_string()));
    }
    Ok(Resolved::Url(url.into()))
}

fn has_http_scheme(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Formats a URL for the address bar.
pub fn display_url(url: &str, strip_scheme: bool) -> String {
    if url == "about:blank" {
        return String::new();
    }
    if !strip_scheme {
        return url.to_string();
    }
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .strip_suffix('/')
        .unwrap_or(without_scheme)
        .to_string()
}

/// Host part of a URL, for "Loading: <host>" status messages.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// True for URLs served over the network, the only ones worth probing.
pub fn is_network_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// True when `a` and `b` share a scheme/host/port origin. Local files
/// count as one origin; other opaque origins never match.
pub fn same_origin(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => {
            if a.scheme() == "file" && b.scheme() == "file" {
                return true;
            }
            let origin = a.origin();
            origin.is_tuple() && origin == b.origin()
        }
        _ => false,
    }
}

/// Tab strip label: blank pages read "New Tab", long titles are cut to
/// `max_chars` characters followed by "...".
pub fn tab_label(title: &str, max_chars: usize) -> String {
    let title = title.trim();
    if title.is_empty() || title == "about:blank" {
        return "New Tab".to_string();
    }
    if title.chars().count() > max_chars {
        let cut: String = title.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}
