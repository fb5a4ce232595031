//! The provider interface and the insertion-ordered registry of providers.
//!
//! Concrete providers (environment-variable readers, system-property
//! readers, properties-file readers, …) are external collaborators — this
//! module specifies only the contract they implement and the registry the
//! resolver consults.

use std::sync::Arc;

use crate::descriptor::ProviderDescriptor;
use crate::error::ConfigResult;
use crate::resolver::Resolver;
use crate::value::{ConfigurationValue, Coordinates, ProviderId};

/// A source of configuration values, keyed by property name and shaped by
/// caller coordinates.
///
/// # Contract
///
/// `lookup` must not mutate `coordinates`, and should return a value whose
/// `name()` equals the requested `name` — though the resolver tolerates and
/// classifies violations of that expectation as malformed rather than
/// trusting the provider (see [`crate::resolver`]).
///
/// A provider may itself call back into the resolver (e.g. to read a
/// derived coordinate before answering). The `resolver` argument exists for
/// exactly that; the reentrancy guard in [`crate::reentrancy`] prevents a
/// provider from being re-entered on the same thread by one of its own
/// nested lookups.
///
/// Implementations may fail — return `Err` to abort the current resolution
/// call. The error propagates unchanged to the original `resolve` caller;
/// the reentrancy guard is released regardless.
///
/// # Examples
///
/// ```rust
/// use locus_config::provider::Provider;
/// use locus_config::{ConfigResult, ConfigurationValue, Coordinates, Resolver};
///
/// struct StaticProvider {
///     coordinates: Coordinates,
///     name: &'static str,
///     value: String,
/// }
///
/// impl Provider for StaticProvider {
///     fn name(&self) -> &'static str {
///         "static"
///     }
///
///     fn lookup(
///         &self,
///         _resolver: &Resolver,
///         _caller_coordinates: &Coordinates,
///         name: &str,
///         id: locus_config::value::ProviderId,
///     ) -> ConfigResult<Option<ConfigurationValue>> {
///         if name != self.name {
///             return Ok(None);
///         }
///         Ok(Some(ConfigurationValue::new(
///             id,
///             self.coordinates.clone(),
///             name,
///             Some(self.value.clone()),
///             false,
///         )))
///     }
/// }
/// ```
pub trait Provider: Send + Sync {
    /// A human-readable identity for diagnostics. Does not need to be
    /// unique; [`ProviderId`] is what the resolver uses for identity.
    fn name(&self) -> &'static str;

    /// Looks up `name` against `caller_coordinates`.
    ///
    /// `id` is this provider's assigned [`ProviderId`] within the registry
    /// it was built from; providers that construct their own
    /// [`ConfigurationValue`] replies pass it straight through as the
    /// value's `source`.
    fn lookup(
        &self,
        resolver: &Resolver,
        caller_coordinates: &Coordinates,
        name: &str,
        id: ProviderId,
    ) -> ConfigResult<Option<ConfigurationValue>>;
}

/// Immutable-after-bootstrap, insertion-ordered sequence of providers.
///
/// Providers are consulted in registration order during every `resolve`
/// call (spec.md §5's ordering guarantee); registry order is otherwise
/// unobservable (reordering providers that produce a single, untied exact
/// match does not change the outcome — spec.md testable property 7).
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self { providers: Vec::new() }
    }

    /// Appends a provider, returning the [`ProviderId`] assigned to it.
    pub(crate) fn register(&mut self, provider: Arc<dyn Provider>) -> ProviderId {
        let id = ProviderId(self.providers.len());
        self.providers.push(provider);
        id
    }

    /// Iterates providers in registration order, paired with their ids.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (ProviderId, &Arc<dyn Provider>)> {
        self.providers.iter().enumerate().map(|(i, p)| (ProviderId(i), p))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Human-readable name of the provider assigned `id`, if any.
    pub fn name_of(&self, id: ProviderId) -> Option<&'static str> {
        self.providers.get(id.0).map(|p| p.name())
    }

    /// Descriptors for every registered provider, in registration order.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.iter().map(|(id, p)| ProviderDescriptor::new(id, p.name())).collect()
    }
}
