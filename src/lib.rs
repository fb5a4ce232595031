//! # locus-config
//!
//! A coordinate-aware configuration resolution engine: given a caller's
//! deployment coordinates (e.g. `{region=west, environment=test}`) and a
//! property name, selects a single value from a federation of independent
//! [`Provider`]s, ranking candidates by specificity, deferring to an
//! authoritative provider on a tie, and falling back to an [`Arbiter`] chain
//! when ranking alone cannot produce a winner.
//!
//! ## What this crate is not
//!
//! It ships no concrete providers (no environment-variable reader, no
//! properties-file reader) and no concrete converters beyond `String` and
//! `Map<String,String>` identity/parsing. Those are external collaborators
//! you register yourself; see [`provider`] and [`converter`].
//!
//! ## Quick Start
//!
//! ```rust
//! use locus_config::provider::Provider;
//! use locus_config::{ConfigResult, ConfigurationValue, Coordinates, ProviderId, Resolver, ResolverBuilder};
//! use std::sync::Arc;
//!
//! struct Fixed {
//!     coordinates: Coordinates,
//!     name: &'static str,
//!     value: &'static str,
//! }
//!
//! impl Provider for Fixed {
//!     fn name(&self) -> &'static str {
//!         "fixed"
//!     }
//!
//!     fn lookup(
//!         &self,
//!         _resolver: &Resolver,
//!         _caller_coordinates: &Coordinates,
//!         name: &str,
//!         id: ProviderId,
//!     ) -> ConfigResult<Option<ConfigurationValue>> {
//!         if name != self.name {
//!             return Ok(None);
//!         }
//!         Ok(Some(ConfigurationValue::new(id, self.coordinates.clone(), name, Some(self.value.to_string()), false)))
//!     }
//! }
//!
//! let resolver = ResolverBuilder::new()
//!     .with_provider(Arc::new(Fixed {
//!         coordinates: Coordinates::new().with("environment", "test"),
//!         name: "db.url",
//!         value: "jdbc:test",
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let caller = Coordinates::new().with("environment", "test");
//! let value = resolver.get_value_for(&caller, "db.url", None).unwrap();
//! assert_eq!(value.as_deref(), Some("jdbc:test"));
//! ```
//!
//! ## Ranking, authority, and arbitration
//!
//! When more than one provider answers for the same property, the resolver
//! prefers the candidate whose coordinates are most specific (closest match
//! to the caller's). A tie at the same specificity is broken by the
//! `authoritative` flag a provider may set on its answer; if the tie
//! survives that too, it is handed to the registered [`arbiter::Arbiter`]
//! chain, and if every arbiter defers, resolution fails with
//! [`ConfigError::Ambiguous`]. See [`resolver`] for the full algorithm.

pub mod arbiter;
pub mod bootstrap;
pub mod converter;
pub mod descriptor;
pub mod error;
pub mod observer;
pub mod provider;
pub mod reentrancy;
pub mod resolver;
pub mod value;

pub use arbiter::{Arbiter, ArbiterChain};
pub use bootstrap::ResolverBuilder;
pub use converter::{Converter, ConverterRegistry, MapConverter, StringConverter, TypeDescriptor};
pub use descriptor::{ConverterDescriptor, ProviderDescriptor};
pub use error::{ConfigError, ConfigResult};
pub use observer::{LoggingObserver, ResolutionObserver};
pub use provider::{Provider, ProviderRegistry};
pub use resolver::Resolver;
pub use value::{ConfigurationValue, Coordinates, ProviderId};
