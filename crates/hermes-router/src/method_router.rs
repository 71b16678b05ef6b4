//! Method-based slots for a single pattern.

use hermes_core::RouteMethod;

/// Maps the registrable methods to values for a single pattern.
///
/// Each method slot can be filled once; a second insert for the same
/// method is rejected and hands the value back.
///
/// # Example
///
/// ```rust
/// use hermes_core::RouteMethod;
/// use hermes_router::MethodRouter;
///
/// let mut router = MethodRouter::new();
/// router.insert(RouteMethod::Get, "show").unwrap();
/// router.insert(RouteMethod::Post, "submit").unwrap();
///
/// assert_eq!(router.get(RouteMethod::Get), Some(&"show"));
/// assert_eq!(router.get(RouteMethod::Delete), None);
/// assert_eq!(router.insert(RouteMethod::Get, "again"), Err("again"));
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    /// GET slot
    get: Option<T>,
    /// POST slot
    post: Option<T>,
    /// PUT slot
    put: Option<T>,
    /// DELETE slot
    delete: Option<T>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            get: None,
            post: None,
            put: None,
            delete: None,
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, method: RouteMethod) -> &Option<T> {
        match method {
            RouteMethod::Get => &self.get,
            RouteMethod::Post => &self.post,
            RouteMethod::Put => &self.put,
            RouteMethod::Delete => &self.delete,
        }
    }

    fn slot_mut(&mut self, method: RouteMethod) -> &mut Option<T> {
        match method {
            RouteMethod::Get => &mut self.get,
            RouteMethod::Post => &mut self.post,
            RouteMethod::Put => &mut self.put,
            RouteMethod::Delete => &mut self.delete,
        }
    }

    /// Fills the slot for `method`.
    ///
    /// # Errors
    ///
    /// Returns the value back if the slot is already taken.
    pub fn insert(&mut self, method: RouteMethod, value: T) -> Result<(), T> {
        let slot = self.slot_mut(method);
        if slot.is_some() {
            return Err(value);
        }
        *slot = Some(value);
        Ok(())
    }

    /// Returns the value registered for `method`.
    #[must_use]
    pub fn get(&self, method: RouteMethod) -> Option<&T> {
        self.slot(method).as_ref()
    }

    /// Returns the value registered for an arbitrary HTTP method.
    ///
    /// Methods outside GET, POST, PUT and DELETE never match.
    #[must_use]
    pub fn get_http(&self, method: &http::Method) -> Option<&T> {
        RouteMethod::from_http(method).and_then(|method| self.get(method))
    }

    /// Returns `true` if `method` has a value.
    #[must_use]
    pub fn contains(&self, method: RouteMethod) -> bool {
        self.slot(method).is_some()
    }

    /// Filled slots in GET, POST, PUT, DELETE order.
    pub fn iter(&self) -> impl Iterator<Item = (RouteMethod, &T)> {
        RouteMethod::ALL
            .into_iter()
            .filter_map(move |method| self.get(method).map(|value| (method, value)))
    }

    /// The first filled slot in GET, POST, PUT, DELETE order.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.iter().next().map(|(_, value)| value)
    }

    /// Methods with a value, in GET, POST, PUT, DELETE order.
    pub fn methods(&self) -> impl Iterator<Item = RouteMethod> + '_ {
        self.iter().map(|(method, _)| method)
    }

    /// Returns `true` if no slot is filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_new_is_empty() {
        let router: MethodRouter<&str> = MethodRouter::new();
        assert!(router.is_empty());
        assert_eq!(router.first(), None);
    }

    #[test]
    fn test_insert_and_get() {
        let mut router = MethodRouter::new();
        router.insert(RouteMethod::Put, 3).unwrap();
        router.insert(RouteMethod::Delete, 4).unwrap();

        assert_eq!(router.get(RouteMethod::Put), Some(&3));
        assert_eq!(router.get_http(&Method::DELETE), Some(&4));
        assert!(router.contains(RouteMethod::Put));
        assert!(!router.contains(RouteMethod::Get));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut router = MethodRouter::new();
        router.insert(RouteMethod::Post, "first").unwrap();
        assert_eq!(router.insert(RouteMethod::Post, "second"), Err("second"));
        assert_eq!(router.get(RouteMethod::Post), Some(&"first"));
    }

    #[test]
    fn test_non_registrable_methods_never_match() {
        let mut router = MethodRouter::new();
        router.insert(RouteMethod::Get, ()).unwrap();
        assert_eq!(router.get_http(&Method::OPTIONS), None);
        assert_eq!(router.get_http(&Method::HEAD), None);
    }

    #[test]
    fn test_iteration_order() {
        let mut router = MethodRouter::new();
        router.insert(RouteMethod::Delete, "d").unwrap();
        router.insert(RouteMethod::Post, "p").unwrap();

        assert_eq!(
            router.methods().collect::<Vec<_>>(),
            [RouteMethod::Post, RouteMethod::Delete]
        );
        assert_eq!(router.first(), Some(&"p"));
    }
}
