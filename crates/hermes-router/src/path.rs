//! Path templates with `{name}` segments.
//!
//! A template is split on `/` into literal and parameter segments. A path
//! matches when it has the same number of segments and every literal
//! segment is equal. Empty segments are ignored on both sides.

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
            Some(name) => Self::Param(name.to_string()),
            None => Self::Literal(raw.to_string()),
        }
    }
}

/// A parsed route pattern.
///
/// # Example
///
/// ```rust
/// use hermes_router::PathTemplate;
///
/// let template = PathTemplate::parse("/{lang}/users/{id}");
/// let params = template.matches("/de/users/42").unwrap();
///
/// assert_eq!(params.get("lang"), Some("de"));
/// assert_eq!(params.get("id"), Some("42"));
/// assert!(template.matches("/de/groups/42").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    pattern: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses `pattern`.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            segments: pattern
                .split('/')
                .filter(|s| !s.is_empty())
                .map(Segment::parse)
                .collect(),
        }
    }

    /// The pattern as registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if the template has no parameter segment.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    /// Parameter names in template order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Matches `path`, returning the captured parameters.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let mut actual = path.split('/').filter(|s| !s.is_empty());
        let mut params = PathParams::default();

        for segment in &self.segments {
            let value = actual.next()?;
            match segment {
                Segment::Literal(expected) if expected != value => return None,
                Segment::Literal(_) => {}
                Segment::Param(name) => params.0.push((name.clone(), value.to_string())),
            }
        }

        if actual.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// Orders two templates that match the same path.
    ///
    /// Segments are compared left to right and a literal segment beats a
    /// parameter, so `/users/me` is more specific than `/users/{id}` and
    /// `/en/{page}` more specific than `/{lang}/about`.
    #[must_use]
    pub fn specificity(&self, other: &Self) -> Ordering {
        let rank = |segment: &Segment| matches!(segment, Segment::Literal(_));
        self.segments
            .iter()
            .map(rank)
            .cmp(other.segments.iter().map(rank))
    }
}

/// Parameters captured from the request path, in template order.
///
/// The dispatcher stores them in the request extensions:
///
/// ```rust
/// use hermes_core::{handler_fn, Request, Response, ResponseExt};
/// use hermes_router::PathParams;
/// use http::StatusCode;
///
/// let handler = handler_fn(|req: Request| async move {
///     let id = req
///         .extensions()
///         .get::<PathParams>()
///         .and_then(|params| params.get("id"))
///         .unwrap_or_default()
///         .to_string();
///     Ok(Response::error(StatusCode::OK, &id))
/// });
/// # let _ = handler;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    /// The raw value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All (name, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_template() {
        let template = PathTemplate::parse("/en/login");
        assert!(template.is_static());
        assert_eq!(template.matches("/en/login"), Some(PathParams::default()));
        assert!(template.matches("/en/login/extra").is_none());
        assert!(template.matches("/en").is_none());
    }

    #[test]
    fn test_captures_in_order() {
        let template = PathTemplate::parse("/orgs/{org}/members/{user}");
        assert!(!template.is_static());
        assert_eq!(template.param_names().collect::<Vec<_>>(), ["org", "user"]);

        let params = template.matches("/orgs/acme/members/ada").unwrap();
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            [("org", "acme"), ("user", "ada")]
        );
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_segment_count_must_match() {
        let template = PathTemplate::parse("/users/{id}");
        assert!(template.matches("/users").is_none());
        assert!(template.matches("/users/1/posts").is_none());
    }

    #[test]
    fn test_literal_beats_param() {
        let me = PathTemplate::parse("/users/me");
        let id = PathTemplate::parse("/users/{id}");
        assert_eq!(me.specificity(&id), Ordering::Greater);
        assert_eq!(id.specificity(&me), Ordering::Less);

        let english = PathTemplate::parse("/en/{page}");
        let any_lang = PathTemplate::parse("/{lang}/about");
        assert_eq!(english.specificity(&any_lang), Ordering::Greater);
        assert_eq!(id.specificity(&id.clone()), Ordering::Equal);
    }
}
