//! Decoded query parameter storage.
//!
//! [`ParameterMap`] mirrors the result of decoding a URL query string: each
//! name carries one or more values, in the order they appeared.

use crate::BindError;
use indexmap::IndexMap;

/// Name to multi-value mapping of decoded query parameters.
///
/// Names keep their first-insertion order. Every stored name has at least one
/// value; scalar extractors only look at the first.
///
/// # Example
///
/// ```rust
/// use querybind::ParameterMap;
///
/// let mut params = ParameterMap::new();
/// params.append("tag", "rust");
/// params.append("tag", "web");
/// params.set("page", "2");
///
/// assert_eq!(params.get("tag"), Some("rust"));
/// assert_eq!(params.get_all("tag"), ["rust", "web"]);
/// assert_eq!(params.get("page"), Some("2"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterMap {
    inner: IndexMap<String, Vec<String>>,
}

impl ParameterMap {
    /// Creates a new empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parameter map with room for `capacity` distinct names.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: IndexMap::with_capacity(capacity),
        }
    }

    /// Decodes `application/x-www-form-urlencoded` text.
    ///
    /// A leading `?` is ignored. Repeated names append to the same entry.
    ///
    /// ```rust
    /// use querybind::ParameterMap;
    ///
    /// let params = ParameterMap::from_query("?q=rust+lang&id=1&id=2").unwrap();
    /// assert_eq!(params.get("q"), Some("rust lang"));
    /// assert_eq!(params.get_all("id"), ["1", "2"]);
    /// ```
    pub fn from_query(query: &str) -> Result<Self, BindError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| BindError::malformed_query(e.to_string()))?;

        Ok(pairs.into_iter().collect())
    }

    /// Appends a value to the list for `name`, creating it if needed.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(name.into()).or_default().push(value.into());
    }

    /// Replaces every value for `name` with `value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(name.into(), vec![value.into()]);
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for `name`, or an empty slice when absent.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.inner.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Returns the number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over `(name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl Extend<(String, String)> for ParameterMap {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

impl FromIterator<(String, String)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}
