//! The resolver: the orchestrator that ties providers, converters, and
//! arbiters together into one deterministic answer per `(coordinates, name)`
//! query. This is the core of the crate; everything else is scaffolding
//! around this module's algorithm.

use std::time::Instant;

use once_cell::sync::OnceCell;

use crate::arbiter::ArbiterChain;
use crate::converter::{Converter, ConverterRegistry, TypeDescriptor};
use crate::descriptor::{ConverterDescriptor, ProviderDescriptor};
use crate::error::{ConfigError, ConfigResult};
use crate::observer::Observers;
use crate::provider::ProviderRegistry;
use crate::reentrancy::ActiveGuard;
use crate::value::{ConfigurationValue, Coordinates};

/// The assembled, immutable-after-bootstrap resolution engine.
///
/// Construct one via [`crate::bootstrap::ResolverBuilder`]; there is no
/// public constructor here because a `Resolver` is only meaningful once its
/// provider/converter/arbiter registries and its cached
/// `configurationCoordinates` have all been fixed in place.
pub struct Resolver {
    providers: ProviderRegistry,
    converters: ConverterRegistry,
    arbiters: ArbiterChain,
    observers: Observers,
    configuration_coordinates: OnceCell<Coordinates>,
}

impl Resolver {
    pub(crate) fn new(
        providers: ProviderRegistry,
        converters: ConverterRegistry,
        arbiters: ArbiterChain,
        observers: Observers,
    ) -> Self {
        Self {
            providers,
            converters,
            arbiters,
            observers,
            configuration_coordinates: OnceCell::new(),
        }
    }

    /// Resolves the reserved `"configurationCoordinates"` property once,
    /// against an empty caller-coordinate set, using the `Map<String,String>`
    /// converter. Called exactly once by
    /// [`crate::bootstrap::ResolverBuilder::build`]; the result is cached and
    /// never recomputed.
    pub(crate) fn bootstrap_configuration_coordinates(&self) -> ConfigResult<Coordinates> {
        let selected = self.resolve_raw(&Coordinates::new(), "configurationCoordinates")?;
        let raw = selected.as_ref().and_then(|v| v.value());
        Ok(self
            .converters
            .convert::<Coordinates>(&TypeDescriptor::of::<Coordinates>(), raw)
            .unwrap_or_default())
    }

    pub(crate) fn finish_bootstrap(&self, coordinates: Coordinates) {
        self.configuration_coordinates
            .set(coordinates)
            .unwrap_or_else(|_| panic!("configuration coordinates already initialized"));
    }

    /// The process-wide coordinates resolved once at bootstrap; the same
    /// instance for the lifetime of this resolver (spec's testable property
    /// 8).
    pub fn configuration_coordinates(&self) -> &Coordinates {
        self.configuration_coordinates
            .get()
            .expect("Resolver is only constructed through ResolverBuilder::build, which always initializes this")
    }

    /// All type descriptors with a registered converter.
    pub fn conversion_types(&self) -> std::collections::HashSet<TypeDescriptor> {
        self.converters.conversion_types()
    }

    /// Descriptors for every registered provider, in registration order.
    /// Introspection only; enumerating providers never triggers a lookup.
    pub fn provider_descriptors(&self) -> Vec<ProviderDescriptor> {
        self.providers.descriptors()
    }

    /// Descriptors for every registered converter.
    pub fn converter_descriptors(&self) -> Vec<ConverterDescriptor> {
        self.converters.descriptors()
    }

    /// `getValue(name)` — process-wide coordinates, `String` converter, no
    /// default.
    pub fn get_value(&self, name: &str) -> ConfigResult<Option<String>> {
        self.resolve_string(&self.configuration_coordinates().clone(), name, None)
    }

    /// `getValue(name, default)` — process-wide coordinates, with fallback.
    /// The `String` converter is a built-in identity passthrough, so a
    /// fallback always yields `Some`.
    pub fn get_value_or(&self, name: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .resolve_string(&self.configuration_coordinates().clone(), name, Some(default))?
            .unwrap_or_else(|| default.to_string()))
    }

    /// `getValue(callerCoordinates, name, default)`.
    pub fn get_value_for(
        &self,
        coordinates: &Coordinates,
        name: &str,
        default: Option<&str>,
    ) -> ConfigResult<Option<String>> {
        self.resolve_string(coordinates, name, default)
    }

    /// `getValue(callerCoordinates, name, typeDescriptor, default)` — looks
    /// up the converter for `T` by its [`TypeDescriptor`]; fails with
    /// [`ConfigError::NoSuchConverter`] if none is registered.
    pub fn get_value_typed<T: Send + Sync + 'static>(
        &self,
        coordinates: Coordinates,
        name: &str,
        default: Option<&str>,
    ) -> ConfigResult<Option<T>> {
        let descriptor = TypeDescriptor::of::<T>();
        if !self.converters.contains(&descriptor) {
            return Err(ConfigError::NoSuchConverter(descriptor));
        }
        let selected = self.resolve_raw(&coordinates, name)?;
        let raw = selected.as_ref().map(|v| v.value()).unwrap_or(default);
        Ok(self.converters.convert::<T>(&descriptor, raw))
    }

    /// `getValue(callerCoordinates, name, explicitConverter, default)` —
    /// bypasses the converter registry entirely.
    pub fn get_value_with<T>(
        &self,
        coordinates: &Coordinates,
        name: &str,
        converter: &dyn Converter<T>,
        default: Option<&str>,
    ) -> ConfigResult<Option<T>> {
        let selected = self.resolve_raw(coordinates, name)?;
        let raw = selected.as_ref().map(|v| v.value()).unwrap_or(default);
        Ok(converter.convert(raw))
    }

    fn resolve_string(
        &self,
        coordinates: &Coordinates,
        name: &str,
        default: Option<&str>,
    ) -> ConfigResult<Option<String>> {
        let selected = self.resolve_raw(coordinates, name)?;
        let raw = selected.as_ref().map(|v| v.value()).unwrap_or(default);
        Ok(self.converters.convert::<String>(&TypeDescriptor::of::<String>(), raw))
    }

    /// Test/diagnostic helper exposing the per-thread reentrancy invariant:
    /// true when no provider is currently marked active on this thread. A
    /// top-level `resolve` call always leaves this true on return.
    #[doc(hidden)]
    pub fn debug_guard_is_empty(&self) -> bool {
        crate::reentrancy::is_empty_on_this_thread()
    }

    /// Runs the full collection + malformed + ranking pipeline (spec.md
    /// §4.5.1–§4.5.3) and returns the winning value, if any.
    pub(crate) fn resolve_raw(
        &self,
        caller_coordinates: &Coordinates,
        name: &str,
    ) -> ConfigResult<Option<ConfigurationValue>> {
        let start = Instant::now();
        if self.observers.has_observers() {
            self.observers.started(caller_coordinates, name);
        }
        let result = self.resolve_raw_inner(caller_coordinates, name);
        if self.observers.has_observers() {
            self.observers.finished(caller_coordinates, name, start.elapsed());
        }
        result
    }

    fn resolve_raw_inner(
        &self,
        caller_coordinates: &Coordinates,
        name: &str,
    ) -> ConfigResult<Option<ConfigurationValue>> {
        let mut bad: Vec<ConfigurationValue> = Vec::new();
        let mut selected: Option<ConfigurationValue> = None;
        let mut tie_queue: Vec<ConfigurationValue> = Vec::new();

        for (id, provider) in self.providers.iter() {
            if crate::reentrancy::is_active(id) {
                continue;
            }
            let looked_up = {
                let _guard = ActiveGuard::enter(id);
                provider.lookup(self, caller_coordinates, name, id)
            }?;

            let value = match looked_up {
                Some(v) => v,
                None => continue,
            };

            if is_malformed(&value, caller_coordinates, name) {
                bad.push(value);
                continue;
            }

            if value.coordinates() == caller_coordinates {
                // Exact match.
                if selected.is_none() && tie_queue.is_empty() {
                    selected = Some(value);
                } else {
                    if let Some(previous) = selected.take() {
                        push_ranked(&mut tie_queue, previous);
                    }
                    push_ranked(&mut tie_queue, value);
                }
            } else {
                // Subset match (everything reaching here passed the
                // malformed classification, so this is a proper,
                // entry-wise subset of caller_coordinates).
                if selected.is_none() {
                    push_ranked(&mut tie_queue, value);
                }
                // else: a strictly-better exact match already exists; this
                // candidate is discarded, but scanning continues so a later
                // duplicate exact match is still caught by classification.
            }
        }

        if !bad.is_empty() && self.observers.has_observers() {
            self.observers.malformed(caller_coordinates, name, &bad);
        }

        if selected.is_none() && !tie_queue.is_empty() {
            selected = self.rank(caller_coordinates, name, tie_queue)?;
        }

        if let Some(ref winner) = selected {
            if self.observers.has_observers() {
                self.observers.resolved(caller_coordinates, name, winner);
            }
        }

        Ok(selected)
    }

    /// Drains a tie queue (already ordered by descending specificity),
    /// applying the ranking rules from spec.md §4.5.3, then arbitrates any
    /// remaining tie.
    fn rank(
        &self,
        caller_coordinates: &Coordinates,
        name: &str,
        tie_queue: Vec<ConfigurationValue>,
    ) -> ConfigResult<Option<ConfigurationValue>> {
        let mut selected: Option<ConfigurationValue> = None;
        let mut arbitration_list: Vec<ConfigurationValue> = Vec::new();
        let mut top_spec: Option<usize> = None;

        for value in tie_queue {
            let s = value.specificity();

            let below_top = match top_spec {
                None => true,
                Some(top) => s < top,
            };

            if below_top {
                if selected.is_none() {
                    top_spec = Some(s);
                    selected = Some(value);
                } else if arbitration_list.is_empty() {
                    // We already have a strict, unique leader and nothing
                    // is contesting it; lower-specificity entries cannot
                    // displace it.
                    break;
                } else {
                    arbitration_list.push(value);
                }
                continue;
            }

            let top = top_spec.expect("below_top is false only once top_spec is Some");
            debug_assert_eq!(s, top, "tie queue must stay sorted by descending specificity");

            let previous = selected.take().expect("a tie at the current rank requires a current leader");
            match (previous.authoritative(), value.authoritative()) {
                (true, true) => {
                    arbitration_list.push(previous);
                    arbitration_list.push(value);
                }
                (false, true) => {
                    selected = Some(value);
                }
                (true, false) => {
                    selected = Some(previous);
                }
                (false, false) => {
                    arbitration_list.push(previous);
                    arbitration_list.push(value);
                }
            }
        }

        if arbitration_list.is_empty() {
            return Ok(selected);
        }

        match self.arbiters.arbitrate(caller_coordinates, name, arbitration_list) {
            Ok(winner) => Ok(Some(winner)),
            Err(ConfigError::Ambiguous { coordinates, name, candidates }) => {
                if self.observers.has_observers() {
                    self.observers.ambiguous(&coordinates, &name, &candidates);
                }
                Err(ConfigError::Ambiguous { coordinates, name, candidates })
            }
            Err(other) => Err(other),
        }
    }
}

/// Inserts `value` into `queue`, keeping the queue sorted by descending
/// specificity. Entries with equal specificity keep their relative push
/// order (stable), which preserves provider registration order for ties.
fn push_ranked(queue: &mut Vec<ConfigurationValue>, value: ConfigurationValue) {
    let position = queue
        .iter()
        .position(|existing| existing.specificity() < value.specificity())
        .unwrap_or(queue.len());
    queue.insert(position, value);
}

/// Classifies `value` as malformed per spec.md §4.5.1 step 3.
fn is_malformed(value: &ConfigurationValue, caller_coordinates: &Coordinates, name: &str) -> bool {
    if value.name() != name {
        return true;
    }
    let caller_len = caller_coordinates.len();
    let value_len = value.coordinates().len();
    if value_len > caller_len {
        return true;
    }
    if value_len == caller_len {
        return value.coordinates() != caller_coordinates;
    }
    !value.coordinates().is_subset_of(caller_coordinates)
}
