//! The fluent binder.
//!
//! A [`Binder`] walks a chain of field extractions over a [`ParameterMap`],
//! handing each converted value to a caller closure that writes it into the
//! destination record. The first error reported anywhere in the chain trips
//! the binder; every later extraction becomes a no-op and [`Binder::parse`]
//! returns that error.

use crate::extras::{self, ExtrasLimits};
use crate::{BindError, ParameterMap};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Standard alphabet, padding required, non-zero trailing bits accepted.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Tag recorded against a claimed parameter name.
///
/// Tags are informational; the binder never type-checks against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Plain or base64 encoded text
    String,
    /// Base-10 signed integer
    Int,
    /// Base64 encoded bytes
    Bytes,
    /// Raw value handed to a caller closure
    Fn,
    /// Every value of a repeated name
    Multi,
    /// Any other caller-defined label
    Custom(&'static str),
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Bytes => write!(f, "bytes"),
            Self::Fn => write!(f, "fn"),
            Self::Multi => write!(f, "multi"),
            Self::Custom(label) => write!(f, "{label}"),
        }
    }
}

/// Control state of a chain.
#[derive(Debug)]
enum ChainState<E> {
    /// No error yet; operations run in full.
    Armed,
    /// An error was recorded; extractions pass through untouched.
    Tripped(E),
}

/// Declarative binder from query parameters into a typed record.
///
/// The binder borrows the parameters immutably and the destination mutably
/// for the length of the chain. It never touches the destination's fields
/// itself: every write goes through a closure supplied by the caller.
///
/// The chain error type `E` defaults to [`BindError`]. Any type implementing
/// `From<BindError>` can be used instead; errors returned by caller closures
/// are stored and returned unchanged.
///
/// # Example
///
/// ```rust
/// use querybind::{BindError, Binder, ParameterMap};
///
/// #[derive(Default)]
/// struct Search {
///     query: String,
///     page: i64,
///     extras: Vec<(String, String)>,
/// }
///
/// let params = ParameterMap::from_query("q=rust&page=3&utm_source=mail").unwrap();
/// let mut search = Search::default();
///
/// Binder::new(&params, &mut search)
///     .string("q", "", |v, s| s.query = v)
///     .int("page", 1, |v, s| s.page = v)
///     .extras(|extras, s| s.extras = extras.into_iter().collect())
///     .parse(|s| {
///         if s.query.is_empty() {
///             return Err(BindError::validation_failed("q is required"));
///         }
///         Ok(())
///     })
///     .unwrap();
///
/// assert_eq!(search.query, "rust");
/// assert_eq!(search.page, 3);
/// assert_eq!(search.extras, vec![("utm_source".to_string(), "mail".to_string())]);
/// ```
pub struct Binder<'a, T, E = BindError> {
    values: &'a ParameterMap,
    destination: &'a mut T,
    state: ChainState<E>,
    claimed: HashMap<String, ParamKind>,
    extras_limits: ExtrasLimits,
}

impl<'a, T> Binder<'a, T> {
    /// Creates a binder whose chain error is [`BindError`].
    #[must_use]
    pub fn new(values: &'a ParameterMap, destination: &'a mut T) -> Self {
        Self::with_error(values, destination)
    }
}

impl<'a, T, E> Binder<'a, T, E>
where
    E: From<BindError> + fmt::Display,
{
    /// Creates a binder with a caller-chosen chain error type.
    ///
    /// ```rust
    /// use querybind::{BindError, Binder, ParameterMap};
    ///
    /// #[derive(Debug)]
    /// enum ApiError {
    ///     Bind(BindError),
    ///     Forbidden,
    /// }
    ///
    /// impl From<BindError> for ApiError {
    ///     fn from(err: BindError) -> Self {
    ///         Self::Bind(err)
    ///     }
    /// }
    ///
    /// impl std::fmt::Display for ApiError {
    ///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    ///         match self {
    ///             Self::Bind(err) => write!(f, "{err}"),
    ///             Self::Forbidden => write!(f, "forbidden"),
    ///         }
    ///     }
    /// }
    ///
    /// let params = ParameterMap::from_query("scope=admin").unwrap();
    /// let mut scope = String::new();
    ///
    /// let result = Binder::<_, ApiError>::with_error(&params, &mut scope)
    ///     .try_raw("scope", |v, _| {
    ///         if v == "admin" {
    ///             return Err(ApiError::Forbidden);
    ///         }
    ///         Ok(())
    ///     })
    ///     .parse(|_| Ok(()));
    ///
    /// assert!(matches!(result, Err(ApiError::Forbidden)));
    /// ```
    #[must_use]
    pub fn with_error(values: &'a ParameterMap, destination: &'a mut T) -> Self {
        Self {
            values,
            destination,
            state: ChainState::Armed,
            claimed: HashMap::new(),
            extras_limits: ExtrasLimits::default(),
        }
    }

    /// Overrides the bounds used by [`Binder::extras`].
    pub fn with_extras_limits(mut self, limits: ExtrasLimits) -> Self {
        self.extras_limits = limits;
        self
    }

    /// Marks `name` as handled so [`Binder::extras`] skips it.
    ///
    /// Registering the same name again only replaces its tag. Registration
    /// happens regardless of the chain state.
    pub fn register_param(mut self, name: &str, kind: ParamKind) -> Self {
        self.claim(name, kind);
        self
    }

    /// Returns true once any operation has recorded an error.
    #[must_use]
    pub fn has_error(&self) -> bool {
        matches!(self.state, ChainState::Tripped(_))
    }

    /// Returns the recorded chain error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&E> {
        match &self.state {
            ChainState::Armed => None,
            ChainState::Tripped(err) => Some(err),
        }
    }

    /// Returns true if `name` has been claimed by an extraction.
    #[must_use]
    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains_key(name)
    }

    /// Returns the tag recorded for `name`.
    #[must_use]
    pub fn claimed_kind(&self, name: &str) -> Option<ParamKind> {
        self.claimed.get(name).copied()
    }

    /// Returns the claimed parameter names, in no particular order.
    pub fn claimed(&self) -> impl Iterator<Item = &str> {
        self.claimed.keys().map(String::as_str)
    }

    /// Extracts a string, substituting `default` when the value is absent or
    /// empty.
    pub fn string(mut self, name: &str, default: &str, f: impl FnOnce(String, &mut T)) -> Self {
        if self.has_error() {
            return self;
        }
        self.claim(name, ParamKind::String);

        let raw = self.first_value(name);
        let value = if raw.is_empty() { default } else { raw };
        f(value.to_string(), &mut *self.destination);
        self
    }

    /// Extracts a standard base64 encoded string.
    ///
    /// `default` is substituted before decoding, following the same rule as
    /// [`Binder::string`], so it must itself be encoded. Line breaks are
    /// skipped and non-zero trailing bits are accepted. A value that fails to
    /// decode becomes the empty string; the chain is not tripped. Decoded
    /// bytes that are not valid UTF-8 are converted lossily.
    ///
    /// ```rust
    /// use querybind::{Binder, ParameterMap};
    ///
    /// let params = ParameterMap::from_query("msg=aGVsbG8%3D&bad=%21%21").unwrap();
    /// let mut out = (String::new(), String::from("untouched"));
    ///
    /// Binder::new(&params, &mut out)
    ///     .base64_string("msg", "", |v, o| o.0 = v)
    ///     .base64_string("bad", "", |v, o| o.1 = v)
    ///     .parse(|_| Ok(()))
    ///     .unwrap();
    ///
    /// assert_eq!(out.0, "hello");
    /// assert_eq!(out.1, "");
    /// ```
    pub fn base64_string(
        mut self,
        name: &str,
        default: &str,
        f: impl FnOnce(String, &mut T),
    ) -> Self {
        if self.has_error() {
            return self;
        }
        self.claim(name, ParamKind::String);

        let value = match String::from_utf8(self.decode(name, default)) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };
        f(value, &mut *self.destination);
        self
    }

    /// Extracts standard base64 encoded bytes.
    ///
    /// Same defaulting and decoding rules as [`Binder::base64_string`], but
    /// the decoded bytes are handed over as-is.
    pub fn base64_bytes(
        mut self,
        name: &str,
        default: &str,
        f: impl FnOnce(Vec<u8>, &mut T),
    ) -> Self {
        if self.has_error() {
            return self;
        }
        self.claim(name, ParamKind::Bytes);

        let bytes = self.decode(name, default);
        f(bytes, &mut *self.destination);
        self
    }

    /// Extracts a base-10 signed integer.
    ///
    /// An absent, empty or malformed value resolves to `default`. This never
    /// trips the chain.
    pub fn int(mut self, name: &str, default: i64, f: impl FnOnce(i64, &mut T)) -> Self {
        if self.has_error() {
            return self;
        }
        self.claim(name, ParamKind::Int);

        let value = self.resolve(name, default);
        f(value, &mut *self.destination);
        self
    }

    /// Extracts any [`FromStr`] value with the same fallback rule as
    /// [`Binder::int`].
    ///
    /// The claimed tag is the Rust type name of `V`.
    pub fn parsed<V: FromStr>(mut self, name: &str, default: V, f: impl FnOnce(V, &mut T)) -> Self {
        if self.has_error() {
            return self;
        }
        self.claim(name, ParamKind::Custom(std::any::type_name::<V>()));

        let value = self.resolve(name, default);
        f(value, &mut *self.destination);
        self
    }

    /// Extracts several integers at once.
    ///
    /// `names` and `defaults` are parallel lists; each name resolves exactly
    /// like [`Binder::int`] and the closure receives the results in order.
    /// Lists of different lengths trip the chain with
    /// `"non-matching size for int params"` before anything is claimed or
    /// written.
    ///
    /// ```rust
    /// use querybind::{Binder, ParameterMap};
    ///
    /// let params = ParameterMap::from_query("min=5&max=oops").unwrap();
    /// let mut range = (0, 0);
    ///
    /// Binder::new(&params, &mut range)
    ///     .ints(&["min", "max"], &[0, 100], |v, r| *r = (v[0], v[1]))
    ///     .parse(|_| Ok(()))
    ///     .unwrap();
    ///
    /// assert_eq!(range, (5, 100));
    /// ```
    pub fn ints(mut self, names: &[&str], defaults: &[i64], f: impl FnOnce(Vec<i64>, &mut T)) -> Self {
        if self.has_error() {
            return self;
        }
        if names.len() != defaults.len() {
            let err = BindError::size_mismatch(names.len(), defaults.len());
            self.trip(None, E::from(err));
            return self;
        }

        let mut values = Vec::with_capacity(names.len());
        for (name, default) in names.iter().zip(defaults) {
            self.claim(name, ParamKind::Int);
            values.push(self.resolve(name, *default));
        }

        f(values, &mut *self.destination);
        self
    }

    /// Extracts every value of a repeated parameter, in order.
    ///
    /// An absent parameter yields an empty list.
    pub fn strings(mut self, name: &str, f: impl FnOnce(Vec<String>, &mut T)) -> Self {
        if self.has_error() {
            return self;
        }
        self.claim(name, ParamKind::Multi);

        let values = self.values.get_all(name).to_vec();
        f(values, &mut *self.destination);
        self
    }

    /// Hands the raw first value (empty when absent) to `f` without any
    /// defaulting or conversion.
    pub fn raw(mut self, name: &str, f: impl FnOnce(String, &mut T)) -> Self {
        if self.has_error() {
            return self;
        }
        self.claim(name, ParamKind::Fn);

        let value = self.first_value(name).to_string();
        f(value, &mut *self.destination);
        self
    }

    /// Like [`Binder::raw`], but `f` may reject the value.
    ///
    /// An `Err` returned by `f` becomes the chain error.
    pub fn try_raw(
        mut self,
        name: &str,
        f: impl FnOnce(String, &mut T) -> Result<(), E>,
    ) -> Self {
        if self.has_error() {
            return self;
        }
        self.claim(name, ParamKind::Fn);

        let value = self.first_value(name).to_string();
        if let Err(err) = f(value, &mut *self.destination) {
            self.trip(Some(name), err);
        }
        self
    }

    /// Runs a cross-field check over the record populated so far.
    ///
    /// An `Err` returned by `f` becomes the chain error.
    pub fn validate(mut self, f: impl FnOnce(&mut T) -> Result<(), E>) -> Self {
        if self.has_error() {
            return self;
        }
        if let Err(err) = f(&mut *self.destination) {
            self.trip(None, err);
        }
        self
    }

    /// Recovers every parameter no extraction has claimed.
    ///
    /// Runs whatever the chain state is, and never changes it. Only the
    /// first value of each name is kept; names or values longer than the
    /// configured [`ExtrasLimits`] are dropped.
    pub fn extras(mut self, f: impl FnOnce(BTreeMap<String, String>, &mut T)) -> Self {
        let recovered = extras::collect(self.values, &self.claimed, &self.extras_limits);
        f(recovered, &mut *self.destination);
        self
    }

    /// Finishes the chain.
    ///
    /// Returns the recorded error without calling `f` if the chain already
    /// tripped; otherwise returns whatever `f` returns.
    pub fn parse(self, f: impl FnOnce(&mut T) -> Result<(), E>) -> Result<(), E> {
        let result = match self.state {
            ChainState::Tripped(err) => Err(err),
            ChainState::Armed => f(self.destination),
        };

        match &result {
            Ok(()) => tracing::trace!(claimed = self.claimed.len(), "binding chain completed"),
            Err(err) => tracing::trace!(error = %err, "binding chain failed"),
        }
        result
    }

    fn claim(&mut self, name: &str, kind: ParamKind) {
        self.claimed.insert(name.to_string(), kind);
    }

    fn trip(&mut self, name: Option<&str>, err: E) {
        tracing::debug!(param = ?name, error = %err, "binding chain tripped");
        self.state = ChainState::Tripped(err);
    }

    fn first_value(&self, name: &str) -> &'a str {
        self.values.get(name).unwrap_or("")
    }

    fn resolve<V: FromStr>(&self, name: &str, default: V) -> V {
        let raw = self.first_value(name);
        if raw.is_empty() {
            return default;
        }
        match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::trace!(param = name, "malformed value, using default");
                default
            }
        }
    }

    fn decode(&self, name: &str, default: &str) -> Vec<u8> {
        let raw = self.first_value(name);
        let value = if raw.is_empty() { default } else { raw };
        if value.is_empty() {
            return Vec::new();
        }

        // Line breaks are ignored, as in MIME-wrapped input
        let value: Cow<'_, str> = if value.contains(['\r', '\n']) {
            Cow::Owned(value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect())
        } else {
            Cow::Borrowed(value)
        };

        match LENIENT_STANDARD.decode(value.as_bytes()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::trace!(param = name, error = %err, "undecodable base64 value, using empty");
                Vec::new()
            }
        }
    }
}
