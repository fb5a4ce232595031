//! Arbiters: the disambiguation step invoked when ranking leaves a tie.

use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult};
use crate::value::{ConfigurationValue, Coordinates};

/// Given an ambiguous candidate set, either resolves it or defers to the
/// next arbiter in the chain.
///
/// Implementations must treat `coordinates` and `values` as read-only.
/// Returning `Ok(None)` means "I defer"; returning `Err` aborts the whole
/// resolution call (an arbiter fault is a collaborator fault, propagated
/// like a provider fault).
///
/// # Examples
///
/// ```rust
/// use locus_config::arbiter::Arbiter;
/// use locus_config::{ConfigResult, ConfigurationValue, Coordinates};
///
/// /// Picks whichever candidate's source provider registered first.
/// struct FirstRegisteredWins;
///
/// impl Arbiter for FirstRegisteredWins {
///     fn name(&self) -> &'static str {
///         "first-registered-wins"
///     }
///
///     fn arbitrate(
///         &self,
///         _coordinates: &Coordinates,
///         _name: &str,
///         values: &[ConfigurationValue],
///     ) -> ConfigResult<Option<ConfigurationValue>> {
///         Ok(values.iter().min_by_key(|v| v.source()).cloned())
///     }
/// }
/// ```
pub trait Arbiter: Send + Sync {
    /// A human-readable identity for diagnostics.
    fn name(&self) -> &'static str;

    /// Attempts to resolve a tie among `values`. All entries share the same
    /// (maximal) specificity; the caller has already exhausted ranking.
    fn arbitrate(
        &self,
        coordinates: &Coordinates,
        name: &str,
        values: &[ConfigurationValue],
    ) -> ConfigResult<Option<ConfigurationValue>>;
}

/// Immutable-after-bootstrap, insertion-ordered chain of arbiters.
///
/// `arbitrate` invokes each arbiter in registration order; the first one
/// to return `Some` wins. If every arbiter defers (or none are registered),
/// the chain fails with [`ConfigError::Ambiguous`].
#[derive(Default, Clone)]
pub struct ArbiterChain {
    arbiters: Vec<Arc<dyn Arbiter>>,
}

impl ArbiterChain {
    pub fn new() -> Self {
        Self { arbiters: Vec::new() }
    }

    pub(crate) fn register(&mut self, arbiter: Arc<dyn Arbiter>) {
        self.arbiters.push(arbiter);
    }

    pub fn len(&self) -> usize {
        self.arbiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arbiters.is_empty()
    }

    /// Runs the chain over `values`, returning the winning value or
    /// [`ConfigError::Ambiguous`] if no arbiter resolved the tie.
    pub(crate) fn arbitrate(
        &self,
        coordinates: &Coordinates,
        name: &str,
        values: Vec<ConfigurationValue>,
    ) -> ConfigResult<ConfigurationValue> {
        for arbiter in &self.arbiters {
            if let Some(winner) = arbiter.arbitrate(coordinates, name, &values)? {
                return Ok(winner);
            }
        }
        Err(ConfigError::Ambiguous {
            coordinates: coordinates.clone(),
            name: name.to_string(),
            candidates: values,
        })
    }
}
