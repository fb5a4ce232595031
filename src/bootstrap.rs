//! Assembles providers, converters, arbiters, and observers into a frozen
//! [`Resolver`], resolving the process-wide `configurationCoordinates`
//! exactly once along the way.

use std::sync::Arc;

use crate::arbiter::{Arbiter, ArbiterChain};
use crate::converter::{Converter, ConverterRegistry, MapConverter, StringConverter};
use crate::error::ConfigResult;
use crate::observer::{Observers, ResolutionObserver};
use crate::provider::{Provider, ProviderRegistry};
use crate::resolver::Resolver;

/// Fluent builder for a [`Resolver`].
///
/// Two converters are registered by default — `String` (identity) and
/// `Map<String,String>` (the `"{a=b,c=d}"` syntax used to parse
/// `configurationCoordinates`) — using insert-if-absent semantics, so a
/// caller's own registration for either type always takes precedence.
///
/// `build()` consumes the builder: there is no runtime "has bootstrap
/// completed yet" flag to check, because a [`Resolver`] simply cannot exist
/// before `build()` returns one. Calling any resolver method before that
/// point is a compile error, not a runtime `IllegalStateError`.
///
/// # Examples
///
/// ```rust
/// use locus_config::ResolverBuilder;
///
/// let resolver = ResolverBuilder::new().build().unwrap();
/// assert!(resolver.configuration_coordinates().is_empty());
/// ```
#[derive(Default)]
pub struct ResolverBuilder {
    providers: ProviderRegistry,
    converters: ConverterRegistry,
    arbiters: ArbiterChain,
    observers: Observers,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            providers: ProviderRegistry::new(),
            converters: ConverterRegistry::new(),
            arbiters: ArbiterChain::new(),
            observers: Observers::new(),
        }
    }

    /// Registers a provider. Providers are consulted in registration order.
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.providers.register(provider);
        self
    }

    /// Registers a converter for `T`. If a converter for the same
    /// [`crate::converter::TypeDescriptor`] is already registered (including
    /// one of the two built-ins), `converter` is discarded — first wins.
    pub fn with_converter<T, C>(mut self, converter: C) -> Self
    where
        T: Send + Sync + 'static,
        C: Converter<T> + 'static,
    {
        self.converters.register::<T, C>(converter);
        self
    }

    /// Registers an arbiter. Arbiters are consulted in registration order
    /// when ranking leaves a tie.
    pub fn with_arbiter(mut self, arbiter: Arc<dyn Arbiter>) -> Self {
        self.arbiters.register(arbiter);
        self
    }

    /// Registers an observer for resolution lifecycle events.
    pub fn with_observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    /// Freezes the registries, wires them into a [`Resolver`], and resolves
    /// `configurationCoordinates` once against an empty caller-coordinate
    /// set.
    pub fn build(mut self) -> ConfigResult<Resolver> {
        self.converters.register::<String, StringConverter>(StringConverter);
        self.converters
            .register::<crate::value::Coordinates, MapConverter>(MapConverter);

        let resolver = Resolver::new(self.providers, self.converters, self.arbiters, self.observers);
        let coordinates = resolver.bootstrap_configuration_coordinates()?;
        resolver.finish_bootstrap(coordinates);
        Ok(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use crate::value::{ConfigurationValue, Coordinates, ProviderId};

    struct FixedCoordinates(&'static str);
    impl Provider for FixedCoordinates {
        fn name(&self) -> &'static str {
            "fixed-coordinates"
        }
        fn lookup(
            &self,
            _resolver: &Resolver,
            _caller_coordinates: &Coordinates,
            name: &str,
            id: ProviderId,
        ) -> crate::error::ConfigResult<Option<ConfigurationValue>> {
            if name != "configurationCoordinates" {
                return Ok(None);
            }
            Ok(Some(ConfigurationValue::new(id, Coordinates::new(), name, Some(self.0.to_string()), false)))
        }
    }

    #[test]
    fn bootstrap_resolves_configuration_coordinates_once() {
        let resolver = ResolverBuilder::new()
            .with_provider(Arc::new(FixedCoordinates("{a=b,c=d}")))
            .build()
            .unwrap();
        let coords = resolver.configuration_coordinates();
        assert_eq!(coords.get("a"), Some("b"));
        assert_eq!(coords.get("c"), Some("d"));
    }

    #[test]
    fn a_caller_registered_converter_takes_precedence_over_the_built_in() {
        struct Loud;
        impl Converter<String> for Loud {
            fn type_descriptor(&self) -> crate::converter::TypeDescriptor {
                crate::converter::TypeDescriptor::of::<String>()
            }
            fn convert(&self, value: Option<&str>) -> Option<String> {
                value.map(|s| format!("LOUD:{s}"))
            }
        }

        let resolver = ResolverBuilder::new().with_converter::<String, Loud>(Loud).build().unwrap();
        let result = resolver.get_value_or("missing", "fallback");
        assert_eq!(result.unwrap(), "LOUD:fallback");
    }
}
