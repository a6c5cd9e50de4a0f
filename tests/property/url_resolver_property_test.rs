//! Property-based tests for address bar resolution.
//!
//! Whatever the user types, resolution either does nothing (blank input),
//! produces a URL the engine can parse, or reports the input invalid.

use clowbrowser::services::url_resolver::{display_url, resolve_input, tab_label, Resolved};
use proptest::prelude::*;
use url::Url;

const SEARCH: &str = "https://search.test/find";

fn arb_host() -> impl Strategy<Value = String> {
    (
        "[a-z][a-z0-9]{1,12}",
        prop_oneof![Just("com"), Just("org"), Just("io"), Just("co.uk")],
    )
        .prop_map(|(name, tld)| format!("{}.{}", name, tld))
}

fn arb_query() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9&=?+%#]{1,10}( [a-zA-Z0-9&=?+%#]{1,10}){1,4}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn hosts_resolve_to_https(host in arb_host(), path in proptest::option::of("/[a-z0-9]{1,8}")) {
        let input = format!("{}{}", host, path.clone().unwrap_or_default());
        let resolved = resolve_input(&input, SEARCH).unwrap();
        let Resolved::Url(url) = resolved else {
            return Err(TestCaseError::fail("expected a URL"));
        };
        let parsed = Url::parse(&url).unwrap();
        prop_assert_eq!(parsed.scheme(), "https");
        prop_assert_eq!(parsed.host_str(), Some(host.as_str()));
    }

    #[test]
    fn text_with_spaces_is_searched(query in arb_query()) {
        let Resolved::Url(url) = resolve_input(&query, SEARCH).unwrap() else {
            return Err(TestCaseError::fail("expected a URL"));
        };
        prop_assert!(url.starts_with("https://search.test/find?q="));
        let parsed = Url::parse(&url).unwrap();
        let q = parsed.query_pairs().find(|(k, _)| k == "q").map(|(_, v)| v.into_owned());
        prop_assert_eq!(q, Some(query.trim().to_string()));
    }

    #[test]
    fn arbitrary_input_never_panics(input in "\\PC{0,40}") {
        match resolve_input(&input, SEARCH) {
            Ok(Resolved::Empty) => prop_assert!(input.trim().is_empty()),
            Ok(Resolved::Url(url)) => prop_assert!(Url::parse(&url).is_ok()),
            Err(_) => prop_assert!(!input.trim().contains(' ')),
        }
    }

    #[test]
    fn stripped_display_has_no_scheme(host in arb_host(), secure in any::<bool>()) {
        let url = format!("{}://{}/", if secure { "https" } else { "http" }, host);
        prop_assert_eq!(display_url(&url, true), host);
        prop_assert_eq!(display_url(&url, false), url);
    }

    #[test]
    fn tab_labels_are_bounded(title in "\\PC{0,80}", max in 1..40usize) {
        let label = tab_label(&title, max);
        prop_assert!(!label.is_empty());
        if label != "New Tab" {
            prop_assert!(label.chars().count() <= max + 3);
        }
    }
}
