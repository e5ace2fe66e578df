//! Request locations
//!
//! Splits a URL (or the path-and-query part of one) into the pieces the
//! matcher cares about, with the application base stripped off.

use serde::Serialize;
use std::borrow::Cow;
use url::{form_urlencoded, Url};

/// A parsed navigation target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Path relative to the base, always starting with `/`
    pub path: String,
    /// Decoded query pairs in source order
    pub query: Vec<(String, String)>,
    /// Fragment without the leading `#`
    pub hash: Option<String>,
}

impl Location {
    /// Parse a URL relative to `base`
    ///
    /// Scheme and authority are dropped when present. The base prefix is
    /// compared case-insensitively.
    pub fn parse(url: &str, base: &str) -> Self {
        let url = strip_origin(url);
        let url: &str = &url;

        let (rest, hash) = match url.split_once('#') {
            Some((rest, hash)) => (rest, Some(hash.to_string())),
            None => (url, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (rest, Vec::new()),
        };

        let base = normalize_base(base);
        let mut path = path;
        if base != "/" {
            let has_base = path
                .get(..base.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&base));
            let rest = path.get(base.len()..).unwrap_or("");
            if has_base && (rest.is_empty() || rest.starts_with('/')) {
                path = rest;
            }
        }

        let path = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        Self { path, query, hash }
    }

    /// Path plus query and hash, as it would appear after the base
    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        if !self.query.is_empty() {
            out.push('?');
            let pairs: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        urlencoding::encode(k).into_owned()
                    } else {
                        format!("{}={}", urlencoding::encode(k), urlencoding::encode(v))
                    }
                })
                .collect();
            out.push_str(&pairs.join("&"));
        }
        if let Some(hash) = &self.hash {
            out.push('#');
            out.push_str(hash);
        }
        out
    }

    /// First value for a query key
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Normalise a base to a leading slash and no trailing slash (`/` for none)
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Reduce an absolute URL to its path, query and fragment
///
/// Only a scheme ahead of the first `/`, `?` or `#` counts, so URLs inside
/// query values are left alone.
fn strip_origin(input: &str) -> Cow<'_, str> {
    let head = input.split(&['/', '?', '#'][..]).next().unwrap_or("");
    let absolute = head.len() > 1
        && head.ends_with(':')
        && input[head.len()..].starts_with("//");
    if !absolute {
        return Cow::Borrowed(input);
    }

    match Url::parse(input) {
        Ok(url) => {
            let mut out = url.path().to_string();
            if let Some(query) = url.query() {
                out.push('?');
                out.push_str(query);
            }
            if let Some(fragment) = url.fragment() {
                out.push('#');
                out.push_str(fragment);
            }
            Cow::Owned(out)
        }
        Err(e) => {
            tracing::warn!("Could not parse '{}' as a URL: {}", input, e);
            Cow::Borrowed(input)
        }
    }
}

/// Form-style query decoding: `+` is a space, pairs without `=` get ""
fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        let loc = Location::parse("/users/7", "/");
        assert_eq!(loc.path, "/users/7");
        assert!(loc.query.is_empty());
        assert!(loc.hash.is_none());
    }

    #[test]
    fn test_parse_query_and_hash() {
        let loc = Location::parse("/users/7?tab=groups&q=a%20b#top", "/");
        assert_eq!(loc.path, "/users/7");
        assert_eq!(loc.query_value("tab"), Some("groups"));
        assert_eq!(loc.query_value("q"), Some("a b"));
        assert_eq!(loc.hash.as_deref(), Some("top"));
        assert_eq!(loc.full_path(), "/users/7?tab=groups&q=a%20b#top");
    }

    #[test]
    fn test_parse_strips_origin() {
        let loc = Location::parse("https://example.com/users/7?x=1", "/");
        assert_eq!(loc.path, "/users/7");

        let loc = Location::parse("https://example.com", "/");
        assert_eq!(loc.path, "/");
    }

    #[test]
    fn test_url_in_query_value_is_not_an_origin() {
        let loc = Location::parse("/users/7?next=https://example.com/login", "/");
        assert_eq!(loc.path, "/users/7");
        assert_eq!(loc.query_value("next"), Some("https://example.com/login"));

        let loc = Location::parse("/users/7#https://example.com/x", "/");
        assert_eq!(loc.path, "/users/7");
        assert_eq!(loc.hash.as_deref(), Some("https://example.com/x"));

        let loc = Location::parse("https://example.com/users/7?next=http://a.b/c", "/");
        assert_eq!(loc.path, "/users/7");
        assert_eq!(loc.query_value("next"), Some("http://a.b/c"));
    }

    #[test]
    fn test_query_plus_is_space() {
        let loc = Location::parse("/users/7?q=a+b&flag&x=%2B", "/");
        assert_eq!(loc.query_value("q"), Some("a b"));
        assert_eq!(loc.query_value("flag"), Some(""));
        assert_eq!(loc.query_value("x"), Some("+"));
    }

    #[test]
    fn test_parse_strips_base() {
        let loc = Location::parse("/App/users/7", "/app/");
        assert_eq!(loc.path, "/users/7");

        let loc = Location::parse("/app", "/app");
        assert_eq!(loc.path, "/");

        let loc = Location::parse("/application", "/app");
        assert_eq!(loc.path, "/application");
    }

    #[test]
    fn test_empty_path_is_root() {
        assert_eq!(Location::parse("", "/").path, "/");
        assert_eq!(Location::parse("?a=1", "/").path, "/");
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base(""), "/");
        assert_eq!(normalize_base("/"), "/");
        assert_eq!(normalize_base("app/"), "/app");
        assert_eq!(normalize_base("/app"), "/app");
    }
}
