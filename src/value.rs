//! The data model: coordinates and the values providers hand back.

use std::collections::HashMap;
use std::fmt;

/// A finite set of name/value coordinates describing a deployment context,
/// e.g. `{region=west, environment=test}`.
///
/// Keys are unique; order is irrelevant to equality or specificity. An empty
/// `Coordinates` is a valid, frequently-used value (the default caller
/// context, and the context `configurationCoordinates` itself is resolved
/// against — see [`crate::bootstrap`]).
///
/// # Examples
///
/// ```rust
/// use locus_config::Coordinates;
///
/// let coords = Coordinates::new()
///     .with("region", "west")
///     .with("environment", "test");
///
/// assert_eq!(coords.len(), 2);
/// assert_eq!(coords.get("region"), Some("west"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coordinates(HashMap<String, String>);

impl Coordinates {
    /// Creates an empty coordinate set.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Builder-style insertion; returns `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts a coordinate in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks up a coordinate value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of coordinates present. This is a value's *specificity*.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no coordinates are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when every entry of `self` is also present (same key, same
    /// value) in `other`. The empty set is a subset of everything,
    /// including itself.
    pub fn is_subset_of(&self, other: &Coordinates) -> bool {
        self.0.iter().all(|(k, v)| other.0.get(k) == Some(v))
    }

    /// Converts from a plain map; used by converters and tests.
    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    /// Exposes the backing map for converters that need owned access.
    pub fn into_map(self) -> HashMap<String, String> {
        self.0
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "{{")?;
        for (i, (k, v)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, String)> for Coordinates {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Identity of a registered [`crate::provider::Provider`].
///
/// Assigned by the registry in registration order; used only to break rare
/// ties and for diagnostics, never to affect which value is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(pub(crate) usize);

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider#{}", self.0)
    }
}

/// An immutable record returned by a provider for one lookup attempt.
///
/// # Invariants
///
/// - `name` is non-empty.
/// - `specificity()` is always `coordinates.len()` and therefore `>= 0`
///   (trivially true for an unsigned length, but kept as an explicit
///   invariant because the source this crate follows derives it from a
///   possibly-absent map).
///
/// Equality is intentionally not derived: ties are broken by specificity
/// and authority, never by comparing values for equality.
///
/// # Examples
///
/// ```rust
/// use locus_config::{ConfigurationValue, Coordinates, ProviderId};
///
/// let value = ConfigurationValue::new(
///     ProviderId::for_tests(0),
///     Coordinates::new().with("environment", "test"),
///     "db.url",
///     Some("jdbc:test".to_string()),
///     false,
/// );
/// assert_eq!(value.specificity(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigurationValue {
    source: ProviderId,
    coordinates: Coordinates,
    name: String,
    value: Option<String>,
    authoritative: bool,
}

impl ConfigurationValue {
    /// Constructs a value. `coordinates` may be empty but is never treated
    /// as absent — callers who have no coordinates should pass
    /// `Coordinates::new()`.
    pub fn new(
        source: ProviderId,
        coordinates: Coordinates,
        name: impl Into<String>,
        value: Option<String>,
        authoritative: bool,
    ) -> Self {
        Self {
            source,
            coordinates,
            name: name.into(),
            value,
            authoritative,
        }
    }

    pub fn source(&self) -> ProviderId {
        self.source
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn authoritative(&self) -> bool {
        self.authoritative
    }

    /// Derived specificity: the cardinality of `coordinates`.
    pub fn specificity(&self) -> usize {
        self.coordinates.len()
    }
}

impl ProviderId {
    /// Constructs an arbitrary `ProviderId` for unit tests and doc examples
    /// that don't go through a registry. Real ids always come from
    /// [`crate::provider::ProviderRegistry::register`].
    pub fn for_tests(id: usize) -> Self {
        ProviderId(id)
    }
}
