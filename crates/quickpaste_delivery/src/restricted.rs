//! Pages the extension may not script: browser-internal schemes and the
//! extension stores.

/// Built-in restricted URL prefixes, lowercase.
pub const RESTRICTED_URL_PREFIXES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "chrome-search://",
    "chrome-untrusted://",
    "edge://",
    "brave://",
    "opera://",
    "vivaldi://",
    "about:",
    "devtools://",
    "view-source:",
    "moz-extension://",
    "https://chrome.google.com/webstore/",
    "https://chromewebstore.google.com/",
    "https://microsoftedge.microsoft.com/addons/",
];

/// Prefix matcher for restricted pages. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictedPages {
    prefixes: Vec<String>,
}

impl Default for RestrictedPages {
    fn default() -> Self {
        Self {
            prefixes: RESTRICTED_URL_PREFIXES
                .iter()
                .map(|prefix| (*prefix).to_string())
                .collect(),
        }
    }
}

impl RestrictedPages {
    /// Built-in prefixes plus `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pages = Self::default();
        for prefix in extra {
            let prefix = prefix.as_ref().trim().to_ascii_lowercase();
            if !prefix.is_empty() && !pages.prefixes.contains(&prefix) {
                pages.prefixes.push(prefix);
            }
        }
        pages
    }

    /// A prefix ending in `/` also covers the bare path without it, so
    /// `https://chromewebstore.google.com` matches but a longer host does not.
    pub fn is_restricted(&self, url: &str) -> bool {
        let url = url.trim().to_ascii_lowercase();
        self.prefixes.iter().any(|prefix| {
            url.starts_with(prefix.as_str())
                || prefix.strip_suffix('/') == Some(url.as_str())
        })
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_internal_and_store_pages_are_restricted() {
        let pages = RestrictedPages::default();
        for url in [
            "chrome://settings",
            "CHROME://extensions/",
            "about:blank",
            "view-source:https://example.com",
            "https://chromewebstore.google.com/detail/abc",
            "https://chrome.google.com/webstore/category/extensions",
            "https://microsoftedge.microsoft.com/addons/detail/x",
        ] {
            assert!(pages.is_restricted(url), "url: {}", url);
        }
    }

    #[test]
    fn ordinary_pages_are_not_restricted() {
        let pages = RestrictedPages::default();
        for url in [
            "https://example.com/form",
            "http://localhost:8080/",
            "https://chrome.google.com/search",
            "file:///tmp/page.html",
        ] {
            assert!(!pages.is_restricted(url), "url: {}", url);
        }
    }

    #[test]
    fn store_prefixes_stop_at_a_path_boundary() {
        let pages = RestrictedPages::default();
        for url in [
            "https://chromewebstore.google.com",
            "https://chromewebstore.google.com/",
            "https://chrome.google.com/webstore",
            "https://microsoftedge.microsoft.com/addons",
        ] {
            assert!(pages.is_restricted(url), "url: {}", url);
        }
        for url in [
            "https://chromewebstore.google.com.example.org/",
            "https://chromewebstore.google.community/",
            "https://chrome.google.com/webstorefront",
            "https://microsoftedge.microsoft.com/addons-help",
        ] {
            assert!(!pages.is_restricted(url), "url: {}", url);
        }
    }

    #[test]
    fn extra_prefixes_extend_the_builtin_list() {
        let pages = RestrictedPages::with_extra(["  FILE:// ", "", "chrome://"]);
        assert!(pages.is_restricted("file:///tmp/page.html"));
        assert_eq!(pages.prefixes().len(), RESTRICTED_URL_PREFIXES.len() + 1);
    }
}
