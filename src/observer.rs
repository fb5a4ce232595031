//! Diagnostic observers for configuration resolution.
//!
//! This is the crate's structured-logging seam. spec.md treats logging as
//! an external collaborator; what this module ships is the hook itself
//! (`ResolutionObserver`) and one trivial sink (`LoggingObserver`) — not a
//! logging backend.

use std::sync::Arc;
use std::time::Duration;

use crate::value::{ConfigurationValue, Coordinates};

/// Hooks into a `resolve` call's lifecycle.
///
/// Every method has a no-op default so implementors only override the
/// events they care about. Observer calls are made synchronously on the
/// resolving thread; keep implementations lightweight.
///
/// # Examples
///
/// ```rust
/// use locus_config::observer::ResolutionObserver;
/// use locus_config::{Coordinates, ConfigurationValue};
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     resolutions: Mutex<usize>,
/// }
///
/// impl ResolutionObserver for CountingObserver {
///     fn resolved(&self, _coordinates: &Coordinates, _name: &str, _selected: &ConfigurationValue) {
///         *self.resolutions.lock().unwrap() += 1;
///     }
/// }
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called before the collection pass begins.
    fn started(&self, _coordinates: &Coordinates, _name: &str) {}

    /// Called when the collection pass classified one or more values as
    /// malformed (spec.md §4.5.2). Resolution continues; this is purely
    /// informational.
    fn malformed(&self, _coordinates: &Coordinates, _name: &str, _bad: &[ConfigurationValue]) {}

    /// Called when ranking (and, if needed, arbitration) produced a winner.
    fn resolved(&self, _coordinates: &Coordinates, _name: &str, _selected: &ConfigurationValue) {}

    /// Called when arbitration was attempted but no arbiter produced a
    /// winner, just before the resolver returns
    /// [`crate::ConfigError::Ambiguous`].
    fn ambiguous(&self, _coordinates: &Coordinates, _name: &str, _candidates: &[ConfigurationValue]) {}

    /// Called when the `resolve` call returns, successfully or not.
    fn finished(&self, _coordinates: &Coordinates, _name: &str, _duration: Duration) {}
}

/// Container for registered observers with a fast path when none are
/// registered — mirrors the zero-overhead-when-unused shape the rest of
/// this crate's ambient instrumentation follows.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn started(&self, coordinates: &Coordinates, name: &str) {
        for observer in &self.observers {
            observer.started(coordinates, name);
        }
    }

    pub(crate) fn malformed(&self, coordinates: &Coordinates, name: &str, bad: &[ConfigurationValue]) {
        for observer in &self.observers {
            observer.malformed(coordinates, name, bad);
        }
    }

    pub(crate) fn resolved(&self, coordinates: &Coordinates, name: &str, selected: &ConfigurationValue) {
        for observer in &self.observers {
            observer.resolved(coordinates, name, selected);
        }
    }

    pub(crate) fn ambiguous(&self, coordinates: &Coordinates, name: &str, candidates: &[ConfigurationValue]) {
        for observer in &self.observers {
            observer.ambiguous(coordinates, name, candidates);
        }
    }

    pub(crate) fn finished(&self, coordinates: &Coordinates, name: &str, duration: Duration) {
        for observer in &self.observers {
            observer.finished(coordinates, name, duration);
        }
    }
}

/// Built-in observer that logs events to stdout/stderr (or, with the
/// `tracing` feature enabled, through `tracing`'s structured events).
///
/// # Examples
///
/// ```rust
/// use locus_config::{ResolverBuilder, observer::LoggingObserver};
/// use std::sync::Arc;
///
/// let resolver = ResolverBuilder::new()
///     .with_observer(Arc::new(LoggingObserver::new()))
///     .build()
///     .unwrap();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self { prefix: "[locus-config]".to_string() }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for LoggingObserver {
    fn started(&self, coordinates: &Coordinates, name: &str) {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "locus_config", %coordinates, name, "starting resolution");
        #[cfg(not(feature = "tracing"))]
        println!("{} resolving '{}' at {}", self.prefix, name, coordinates);
    }

    fn malformed(&self, coordinates: &Coordinates, name: &str, bad: &[ConfigurationValue]) {
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "locus_config", %coordinates, name, count = bad.len(), "discarding malformed configuration values");
        #[cfg(not(feature = "tracing"))]
        eprintln!(
            "{} {} malformed value(s) for '{}' at {} discarded",
            self.prefix,
            bad.len(),
            name,
            coordinates
        );
    }

    fn resolved(&self, coordinates: &Coordinates, name: &str, selected: &ConfigurationValue) {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "locus_config", %coordinates, name, source = %selected.source(), "resolved");
        #[cfg(not(feature = "tracing"))]
        println!(
            "{} resolved '{}' at {} from {}",
            self.prefix,
            name,
            coordinates,
            selected.source()
        );
    }

    fn ambiguous(&self, coordinates: &Coordinates, name: &str, candidates: &[ConfigurationValue]) {
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "locus_config", %coordinates, name, count = candidates.len(), "ambiguous resolution, no arbiter resolved it");
        #[cfg(not(feature = "tracing"))]
        eprintln!(
            "{} ambiguous resolution for '{}' at {}: {} tied candidates",
            self.prefix,
            name,
            coordinates,
            candidates.len()
        );
    }

    fn finished(&self, coordinates: &Coordinates, name: &str, duration: Duration) {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "locus_config", %coordinates, name, ?duration, "finished");
        #[cfg(not(feature = "tracing"))]
        println!("{} finished '{}' at {} in {:?}", self.prefix, name, coordinates, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ProviderId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<&'static str>>,
    }

    impl ResolutionObserver for Recorder {
        fn started(&self, _c: &Coordinates, _n: &str) {
            self.events.lock().unwrap().push("started");
        }
        fn malformed(&self, _c: &Coordinates, _n: &str, _bad: &[ConfigurationValue]) {
            self.events.lock().unwrap().push("malformed");
        }
        fn resolved(&self, _c: &Coordinates, _n: &str, _s: &ConfigurationValue) {
            self.events.lock().unwrap().push("resolved");
        }
        fn ambiguous(&self, _c: &Coordinates, _n: &str, _cands: &[ConfigurationValue]) {
            self.events.lock().unwrap().push("ambiguous");
        }
        fn finished(&self, _c: &Coordinates, _n: &str, _d: Duration) {
            self.events.lock().unwrap().push("finished");
        }
    }

    #[test]
    fn empty_observer_set_has_no_overhead_flag() {
        let observers = Observers::new();
        assert!(!observers.has_observers());
    }

    #[test]
    fn all_registered_observers_are_notified() {
        let recorder = Arc::new(Recorder::default());
        let mut observers = Observers::new();
        observers.add(recorder.clone());

        let coords = Coordinates::new();
        observers.started(&coords, "x");
        let value = ConfigurationValue::new(ProviderId::for_tests(0), coords.clone(), "x", Some("v".into()), false);
        observers.resolved(&coords, "x", &value);
        observers.finished(&coords, "x", Duration::from_millis(1));

        assert_eq!(*recorder.events.lock().unwrap(), vec!["started", "resolved", "finished"]);
    }
}
