//! Recovery of unclaimed parameters.
//!
//! Parameters a chain never registered can still be captured as a flat
//! `name -> first value` mapping. Oversized names and values are dropped so
//! a hostile query string cannot be copied wholesale into a free-form field.

use crate::ParameterMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Default maximum length, in bytes, of an extras parameter name.
pub const DEFAULT_MAX_NAME_LEN: usize = 20;

/// Default maximum length, in bytes, of an extras parameter value.
pub const DEFAULT_MAX_VALUE_LEN: usize = 255;

/// Size bounds applied when recovering extras.
///
/// Both bounds are inclusive: a name of exactly `max_name_len` bytes is kept.
///
/// # Example
///
/// ```rust
/// use querybind::ExtrasLimits;
///
/// let limits = ExtrasLimits::default();
/// assert!(limits.admits("email", "the@email.com"));
/// assert!(!limits.admits(&"n".repeat(21), "x"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtrasLimits {
    /// Longest accepted parameter name.
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    /// Longest accepted first value.
    #[serde(default = "default_max_value_len")]
    pub max_value_len: usize,
}

impl Default for ExtrasLimits {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
        }
    }
}

fn default_max_name_len() -> usize {
    DEFAULT_MAX_NAME_LEN
}

fn default_max_value_len() -> usize {
    DEFAULT_MAX_VALUE_LEN
}

impl ExtrasLimits {
    /// Returns true if a `name`/`value` pair fits within both bounds.
    #[must_use]
    pub fn admits(&self, name: &str, value: &str) -> bool {
        name.len() <= self.max_name_len && value.len() <= self.max_value_len
    }
}

/// Collects every parameter of `values` that is not in `claimed` and fits
/// within `limits`.
pub(crate) fn collect<K>(
    values: &ParameterMap,
    claimed: &HashMap<String, K>,
    limits: &ExtrasLimits,
) -> BTreeMap<String, String> {
    let mut extras = BTreeMap::new();

    for (name, all) in values.iter() {
        if claimed.contains_key(name) {
            continue;
        }
        let Some(first) = all.first() else {
            continue;
        };
        if !limits.admits(name, first) {
            tracing::debug!(
                name_len = name.len(),
                value_len = first.len(),
                "dropping oversized extra parameter"
            );
            continue;
        }
        extras.insert(name.to_string(), first.clone());
    }

    extras
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ParameterMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_default_limits() {
        let limits = ExtrasLimits::default();
        assert_eq!(limits.max_name_len, 20);
        assert_eq!(limits.max_value_len, 255);
    }

    #[test]
    fn test_limits_are_inclusive() {
        let limits = ExtrasLimits::default();

        assert!(limits.admits(&"a".repeat(20), &"v".repeat(255)));
        assert!(!limits.admits(&"a".repeat(21), "v"));
        assert!(!limits.admits("a", &"v".repeat(256)));
    }

    #[test]
    fn test_collect_skips_claimed() {
        let values = params(&[("n", "bla"), ("o", "me"), ("e", "the@email.com")]);
        let claimed: HashMap<String, ()> =
            [("n".to_string(), ()), ("o".to_string(), ())].into_iter().collect();

        let extras = collect(&values, &claimed, &ExtrasLimits::default());

        assert_eq!(extras.len(), 1);
        assert_eq!(extras.get("e").map(String::as_str), Some("the@email.com"));
    }

    #[test]
    fn test_collect_uses_first_value() {
        let values = params(&[("tag", "first"), ("tag", "second")]);
        let extras = collect(&values, &HashMap::<String, ()>::new(), &ExtrasLimits::default());

        assert_eq!(extras.get("tag").map(String::as_str), Some("first"));
    }

    #[test]
    fn test_collect_drops_oversized_without_truncating() {
        let long_name = "x".repeat(21);
        let long_value = "y".repeat(256);
        let values = params(&[
            (long_name.as_str(), "v"),
            ("big", long_value.as_str()),
            ("ok", "fine"),
        ]);

        let extras = collect(&values, &HashMap::<String, ()>::new(), &ExtrasLimits::default());

        assert_eq!(extras.len(), 1);
        assert!(extras.contains_key("ok"));
    }

    #[test]
    fn test_collect_custom_limits() {
        let values = params(&[("abc", "12345"), ("abcd", "1")]);
        let limits = ExtrasLimits {
            max_name_len: 3,
            max_value_len: 4,
        };

        let extras = collect(&values, &HashMap::<String, ()>::new(), &limits);

        assert!(extras.is_empty());
    }

    #[test]
    fn test_limits_deserialize_with_defaults() {
        let limits: ExtrasLimits = serde_json::from_str(r#"{"max_name_len": 32}"#).unwrap();
        assert_eq!(limits.max_name_len, 32);
        assert_eq!(limits.max_value_len, 255);
    }
}
