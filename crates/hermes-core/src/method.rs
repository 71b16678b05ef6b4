//! The HTTP methods a route can be registered for.

use http::Method;

/// HTTP method of a route registration.
///
/// Routes are registered for exactly one of these four methods. Other
/// methods can still reach a pattern (e.g. CORS preflight `OPTIONS`) but
/// never select a handler of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl RouteMethod {
    /// All registrable methods, in a stable order.
    pub const ALL: [RouteMethod; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];

    /// Returns the matching [`http::Method`].
    #[must_use]
    pub fn as_http(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    /// Maps an [`http::Method`] to a registrable method, if it is one.
    #[must_use]
    pub fn from_http(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::POST => Some(Self::Post),
            Method::PUT => Some(Self::Put),
            Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }

    /// Upper-case method name (`"GET"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Lower-case method name, as used for OpenAPI path item keys.
    #[must_use]
    pub const fn as_lowercase(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RouteMethod> for Method {
    fn from(method: RouteMethod) -> Self {
        method.as_http()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_round_trip_for_all_methods() {
        for method in RouteMethod::ALL {
            assert_eq!(RouteMethod::from_http(&method.as_http()), Some(method));
        }
    }

    #[test]
    fn test_unregistrable_methods() {
        assert_eq!(RouteMethod::from_http(&Method::OPTIONS), None);
        assert_eq!(RouteMethod::from_http(&Method::PATCH), None);
        assert_eq!(RouteMethod::from_http(&Method::HEAD), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(RouteMethod::Delete.as_str(), "DELETE");
        assert_eq!(RouteMethod::Delete.as_lowercase(), "delete");
        assert_eq!(RouteMethod::Put.to_string(), "PUT");
    }
}
