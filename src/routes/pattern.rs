//! Path Pattern Parser
//!
//! Parses route paths into segment lists and matches request paths against them.
//!
//! # Supported Syntax
//!
//! ```text
//! ""               root (same as "/")
//! "/about"         static segments
//! "/users/:id"     named param, one segment
//! "/posts/:slug?"  optional param
//! "/files/*"       trailing splat, captured as `pathMatch`
//! "*"              catch-all, captures the whole path as `pathMatch`
//! ```
//!
//! Static segments compare case-insensitively unless the table asks otherwise,
//! and a single trailing slash on the request path is ignored.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{map, opt},
    multi::many0,
    sequence::preceded,
    IResult,
};
use std::collections::BTreeMap;

use crate::routes::error::{RouteError, RouteResult};

/// Path params extracted by a match, percent-decoded
pub type Params = BTreeMap<String, String>;

/// Param name used for wildcard captures
pub const SPLAT_PARAM: &str = "pathMatch";

/// One segment of a parsed pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text between slashes
    Static(String),
    /// `:name` or `:name?`
    Param { name: String, optional: bool },
    /// `*`, matches the rest of the path
    Splat,
}

/// A parsed route path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    catch_all: bool,
}

impl PathPattern {
    /// Parse a route path
    pub fn parse(path: &str) -> RouteResult<Self> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if path == "*" {
            return Ok(Self {
                raw: path.to_string(),
                segments: vec![Segment::Splat],
                catch_all: true,
            });
        }

        if !path.is_empty() && !path.starts_with('/') {
            return Err(invalid("top-level paths must start with '/'"));
        }

        let segments = match parse_segments(path) {
            Ok(("", segments)) => segments,
            Ok((rest, _)) => return Err(invalid(&format!("unexpected input '{}'", rest))),
            Err(e) => return Err(invalid(&format!("{:?}", e))),
        };

        let mut seen = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Splat if i + 1 != segments.len() => {
                    return Err(invalid("'*' may only appear as the last segment"));
                }
                Segment::Param { name, .. } => {
                    if seen.contains(&name.as_str()) {
                        return Err(invalid(&format!("param '{}' appears twice", name)));
                    }
                    seen.push(name.as_str());
                }
                _ => {}
            }
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
            catch_all: false,
        })
    }

    /// The path exactly as authored
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True for the bare `*` pattern
    pub fn is_catch_all(&self) -> bool {
        self.catch_all
    }

    /// Names of all params this pattern can capture, in order
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param { name, .. } => Some(name.as_str()),
                Segment::Splat => Some(SPLAT_PARAM),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// Names of params that must be present for a match
    pub fn required_params(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param {
                    name,
                    optional: false,
                } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Match a request path (already stripped of query, hash and base)
    pub fn matches(&self, path: &str, case_sensitive: bool) -> Option<Params> {
        let parts = split_path(path);
        let mut params = Params::new();

        if self.catch_all {
            let full = format!("/{}", parts.join("/"));
            params.insert(SPLAT_PARAM.to_string(), decode(&full));
            return Some(params);
        }

        if match_segments(&self.segments, &parts, case_sensitive, &mut params) {
            Some(params)
        } else {
            None
        }
    }

    /// Build a concrete path from params
    pub fn interpolate(&self, params: &Params) -> Result<String, String> {
        if self.catch_all {
            let rest = params.get(SPLAT_PARAM).map(String::as_str).unwrap_or("/");
            return Ok(if rest.starts_with('/') {
                rest.to_string()
            } else {
                format!("/{}", rest)
            });
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Static(text) => {
                    out.push('/');
                    out.push_str(text);
                }
                Segment::Param { name, optional } => match params.get(name) {
                    Some(value) => {
                        out.push('/');
                        out.push_str(&urlencoding::encode(value));
                    }
                    None if *optional => {}
                    None => return Err(name.clone()),
                },
                Segment::Splat => {
                    if let Some(rest) = params.get(SPLAT_PARAM) {
                        let rest = rest.trim_start_matches('/');
                        if !rest.is_empty() {
                            out.push('/');
                            out.push_str(rest);
                        }
                    }
                }
            }
        }

        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

/// Split a request path into its non-empty-path segments
///
/// `/` and `` both yield no segments; one trailing slash is ignored.
fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

fn match_segments(
    pattern: &[Segment],
    parts: &[&str],
    case_sensitive: bool,
    params: &mut Params,
) -> bool {
    let Some((head, tail)) = pattern.split_first() else {
        return parts.is_empty();
    };

    match head {
        Segment::Static(text) => match parts.split_first() {
            Some((part, rest)) if segment_eq(text, part, case_sensitive) => {
                match_segments(tail, rest, case_sensitive, params)
            }
            _ => false,
        },
        Segment::Param { name, optional } => {
            if let Some((part, rest)) = parts.split_first() {
                if !part.is_empty() {
                    params.insert(name.clone(), decode(part));
                    if match_segments(tail, rest, case_sensitive, params) {
                        return true;
                    }
                    params.remove(name);
                }
            }
            *optional && match_segments(tail, parts, case_sensitive, params)
        }
        Segment::Splat => {
            params.insert(SPLAT_PARAM.to_string(), decode(&parts.join("/")));
            true
        }
    }
}

fn segment_eq(pattern: &str, part: &str, case_sensitive: bool) -> bool {
    let part = decode(part);
    if case_sensitive {
        pattern == part
    } else {
        pattern.eq_ignore_ascii_case(&part)
    }
}

/// Percent-decode, keeping the raw text when it is not valid UTF-8
pub(crate) fn decode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            tracing::warn!("Could not percent-decode '{}', keeping it raw", raw);
            raw.to_string()
        }
    }
}

// ============================================
// nom parsers
// ============================================

fn parse_segments(input: &str) -> IResult<&str, Vec<Segment>> {
    let (input, segments) = many0(parse_segment)(input)?;
    let (input, _) = opt(char('/'))(input)?;
    Ok((input, segments))
}

fn parse_segment(input: &str) -> IResult<&str, Segment> {
    preceded(char('/'), alt((parse_param, parse_splat, parse_static)))(input)
}

fn parse_param(input: &str) -> IResult<&str, Segment> {
    let (input, _) = char(':')(input)?;
    let (input, name) = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)?;
    let (input, optional) = opt(char('?'))(input)?;
    Ok((
        input,
        Segment::Param {
            name: name.to_string(),
            optional: optional.is_some(),
        },
    ))
}

fn parse_splat(input: &str) -> IResult<&str, Segment> {
    map(char('*'), |_| Segment::Splat)(input)
}

fn parse_static(input: &str) -> IResult<&str, Segment> {
    map(
        take_while1(|c: char| !matches!(c, '/' | ':' | '*' | '?')),
        |s: &str| Segment::Static(s.to_string()),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root() {
        let empty = PathPattern::parse("").unwrap();
        assert!(empty.segments().is_empty());
        assert!(empty.matches("/", false).is_some());

        let slash = PathPattern::parse("/").unwrap();
        assert!(slash.segments().is_empty());
        assert!(slash.matches("/users", false).is_none());
    }

    #[test]
    fn test_parse_params() {
        let pattern = PathPattern::parse("/users/:id/posts/:slug?").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Static("users".to_string()),
                Segment::Param {
                    name: "id".to_string(),
                    optional: false
                },
                Segment::Static("posts".to_string()),
                Segment::Param {
                    name: "slug".to_string(),
                    optional: true
                },
            ]
        );
        assert_eq!(pattern.param_names(), vec!["id", "slug"]);
        assert_eq!(pattern.required_params(), vec!["id"]);
    }

    #[test]
    fn test_parse_rejects_bad_patterns() {
        assert!(PathPattern::parse("users").is_err());
        assert!(PathPattern::parse("/a//b").is_err());
        assert!(PathPattern::parse("/*/tail").is_err());
        assert!(PathPattern::parse("/:id/:id").is_err());
        assert!(PathPattern::parse("/users/:").is_err());
    }

    #[test]
    fn test_match_param() {
        let pattern = PathPattern::parse("/users/:id").unwrap();
        let params = pattern.matches("/users/42", false).unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        assert!(pattern.matches("/users", false).is_none());
        assert!(pattern.matches("/users/42/extra", false).is_none());
        assert!(pattern.matches("/users/42/", false).is_some());
    }

    #[test]
    fn test_match_decodes_params() {
        let pattern = PathPattern::parse("/users/:id").unwrap();
        let params = pattern.matches("/users/jane%20doe", false).unwrap();
        assert_eq!(params["id"], "jane doe");
    }

    #[test]
    fn test_match_case_sensitivity() {
        let pattern = PathPattern::parse("/About").unwrap();
        assert!(pattern.matches("/about", false).is_some());
        assert!(pattern.matches("/about", true).is_none());
        assert!(pattern.matches("/About", true).is_some());
    }

    #[test]
    fn test_match_optional_param() {
        let pattern = PathPattern::parse("/posts/:slug?/comments").unwrap();
        let with = pattern.matches("/posts/hello/comments", false).unwrap();
        assert_eq!(with["slug"], "hello");

        let without = pattern.matches("/posts/comments", false).unwrap();
        assert!(without.get("slug").is_none());
    }

    #[test]
    fn test_catch_all() {
        let pattern = PathPattern::parse("*").unwrap();
        assert!(pattern.is_catch_all());
        let params = pattern.matches("/no/such/page", false).unwrap();
        assert_eq!(params[SPLAT_PARAM], "/no/such/page");
    }

    #[test]
    fn test_trailing_splat() {
        let pattern = PathPattern::parse("/files/*").unwrap();
        let params = pattern.matches("/files/a/b.txt", false).unwrap();
        assert_eq!(params[SPLAT_PARAM], "a/b.txt");
    }

    #[test]
    fn test_interpolate() {
        let pattern = PathPattern::parse("/users/:id").unwrap();
        let mut params = Params::new();
        params.insert("id".to_string(), "a b".to_string());
        assert_eq!(pattern.interpolate(&params).unwrap(), "/users/a%20b");

        assert_eq!(
            pattern.interpolate(&Params::new()).unwrap_err(),
            "id".to_string()
        );

        let root = PathPattern::parse("").unwrap();
        assert_eq!(root.interpolate(&Params::new()).unwrap(), "/");
    }
}
