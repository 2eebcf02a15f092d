//! # Querybind
//!
//! Declarative binding of decoded query parameters into typed records.
//!
//! A [`Binder`] borrows a [`ParameterMap`] and a destination record, then
//! runs a fluent chain of typed extractions. Each extraction converts one
//! parameter and hands it to a caller closure that writes it into the
//! record. The binder itself never knows the record's layout.
//!
//! ## Extractions
//!
//! | Operation | Value | Fallback |
//! |-----------|-------|----------|
//! | [`Binder::string`] | first value | default when empty |
//! | [`Binder::base64_string`] | decoded first value | default when empty, `""` when undecodable |
//! | [`Binder::base64_bytes`] | decoded bytes | default when empty, no bytes when undecodable |
//! | [`Binder::int`] | base-10 `i64` | default when empty or malformed |
//! | [`Binder::parsed`] | any `FromStr` | default when empty or malformed |
//! | [`Binder::ints`] | several `i64` at once | per-name default |
//! | [`Binder::strings`] | every value of a name | empty list |
//! | [`Binder::raw`] | raw first value | none |
//! | [`Binder::try_raw`] | raw first value, closure may fail | none |
//!
//! ## Error model
//!
//! A chain tracks at most one error and the first one wins. Errors come
//! from two places only: the batch integer extractor when its argument lists
//! differ in length, and caller closures ([`Binder::try_raw`],
//! [`Binder::validate`], [`Binder::parse`]). Malformed individual values never
//! fail the chain; they fall back to defaults.
//!
//! Once a chain has tripped, extractions stop reading parameters, writing
//! the record and claiming names. [`Binder::extras`] is the exception: it
//! always runs so diagnostic data can still be collected.
//!
//! ## Example
//!
//! ```rust
//! use querybind::{BindError, Binder, ParameterMap};
//!
//! #[derive(Debug, Default)]
//! struct ListFilter {
//!     owner: String,
//!     offset: i64,
//!     limit: i64,
//!     extras: String,
//! }
//!
//! let params = ParameterMap::from_query("owner=me&limit=50&ref=newsletter").unwrap();
//! let mut filter = ListFilter::default();
//!
//! let result = Binder::new(&params, &mut filter)
//!     .string("owner", "", |v, f| f.owner = v)
//!     .ints(&["offset", "limit"], &[0, 20], |v, f| {
//!         f.offset = v[0];
//!         f.limit = v[1];
//!     })
//!     .validate(|f| {
//!         if f.limit > 100 {
//!             return Err(BindError::invalid("limit", "must not exceed 100"));
//!         }
//!         Ok(())
//!     })
//!     .extras(|extras, f| {
//!         f.extras = extras
//!             .iter()
//!             .map(|(k, v)| format!("{k}={v}"))
//!             .collect::<Vec<_>>()
//!             .join("&");
//!     })
//!     .parse(|_| Ok(()));
//!
//! assert!(result.is_ok());
//! assert_eq!(filter.owner, "me");
//! assert_eq!((filter.offset, filter.limit), (0, 50));
//! assert_eq!(filter.extras, "ref=newsletter");
//! ```

#![doc(html_root_url = "https://docs.rs/querybind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod error;
mod extras;
mod params;

pub use binder::{Binder, ParamKind};
pub use error::{BindError, SIZE_MISMATCH_MESSAGE};
pub use extras::{ExtrasLimits, DEFAULT_MAX_NAME_LEN, DEFAULT_MAX_VALUE_LEN};
pub use params::ParameterMap;
