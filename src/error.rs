//! Error types for the configuration resolution engine.

use std::fmt;

use crate::converter::TypeDescriptor;
use crate::value::{Coordinates, ConfigurationValue};

/// Errors surfaced by the resolver and its collaborators.
///
/// # Examples
///
/// ```rust
/// use locus_config::{ConfigError, ResolverBuilder};
///
/// let resolver = ResolverBuilder::new().build().unwrap();
/// match resolver.get_value_typed::<u32>(Default::default(), "port", None) {
///     Err(ConfigError::NoSuchConverter(desc)) => {
///         println!("no converter registered for {}", desc.name());
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// A type-based lookup named a [`TypeDescriptor`] with no registered converter.
    NoSuchConverter(TypeDescriptor),
    /// Arbitration was required but every arbiter in the chain deferred.
    Ambiguous {
        coordinates: Coordinates,
        name: String,
        candidates: Vec<ConfigurationValue>,
    },
    /// A collaborator (provider, converter, or arbiter) reported a failure.
    ///
    /// The core never constructs this variant itself; it is the channel
    /// through which fallible collaborators propagate their own errors.
    Collaborator {
        source: &'static str,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoSuchConverter(desc) => {
                write!(f, "no converter registered for type: {}", desc.name())
            }
            ConfigError::Ambiguous { coordinates, name, candidates } => write!(
                f,
                "ambiguous configuration value for '{}' at {:?}: {} candidates tied and no arbiter resolved them",
                name,
                coordinates,
                candidates.len()
            ),
            ConfigError::Collaborator { source, message } => {
                write!(f, "{} failed: {}", source, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result type used throughout the resolution engine.
pub type ConfigResult<T> = Result<T, ConfigError>;
