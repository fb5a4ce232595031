//! Coverage for the arbiter chain and the observer lifecycle hooks, beyond
//! the seed scenarios.

use locus_config::arbiter::Arbiter;
use locus_config::observer::ResolutionObserver;
use locus_config::provider::Provider;
use locus_config::{ConfigResult, ConfigurationValue, Coordinates, ProviderId, Resolver, ResolverBuilder};
use std::sync::{Arc, Mutex};

struct Fixed {
    coordinates: Coordinates,
    name: &'static str,
    value: &'static str,
}

impl Provider for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn lookup(
        &self,
        _resolver: &Resolver,
        _caller_coordinates: &Coordinates,
        name: &str,
        id: ProviderId,
    ) -> ConfigResult<Option<ConfigurationValue>> {
        if name != self.name {
            return Ok(None);
        }
        Ok(Some(ConfigurationValue::new(id, self.coordinates.clone(), name, Some(self.value.to_string()), false)))
    }
}

/// Picks whichever candidate's source provider registered last.
struct LastRegisteredWins;

impl Arbiter for LastRegisteredWins {
    fn name(&self) -> &'static str {
        "last-registered-wins"
    }

    fn arbitrate(&self, _coordinates: &Coordinates, _name: &str, values: &[ConfigurationValue]) -> ConfigResult<Option<ConfigurationValue>> {
        Ok(values.iter().max_by_key(|v| v.source()).cloned())
    }
}

struct DeferringArbiter;

impl Arbiter for DeferringArbiter {
    fn name(&self) -> &'static str {
        "defers"
    }

    fn arbitrate(&self, _coordinates: &Coordinates, _name: &str, _values: &[ConfigurationValue]) -> ConfigResult<Option<ConfigurationValue>> {
        Ok(None)
    }
}

#[test]
fn an_arbiter_resolves_a_disjoint_tie() {
    let caller = Coordinates::new().with("region", "west").with("phase", "experimental");
    let resolver = ResolverBuilder::new()
        .with_provider(Arc::new(Fixed { coordinates: Coordinates::new().with("region", "west"), name: "db.url", value: "jdbc:west" }))
        .with_provider(Arc::new(Fixed { coordinates: Coordinates::new().with("phase", "experimental"), name: "db.url", value: "jdbc:experimental" }))
        .with_arbiter(Arc::new(LastRegisteredWins))
        .build()
        .unwrap();

    let result = resolver.get_value_for(&caller, "db.url", None).unwrap();
    assert_eq!(result.as_deref(), Some("jdbc:experimental"));
}

#[test]
fn an_earlier_deferring_arbiter_falls_through_to_the_next() {
    let caller = Coordinates::new().with("region", "west").with("phase", "experimental");
    let resolver = ResolverBuilder::new()
        .with_provider(Arc::new(Fixed { coordinates: Coordinates::new().with("region", "west"), name: "db.url", value: "jdbc:west" }))
        .with_provider(Arc::new(Fixed { coordinates: Coordinates::new().with("phase", "experimental"), name: "db.url", value: "jdbc:experimental" }))
        .with_arbiter(Arc::new(DeferringArbiter))
        .with_arbiter(Arc::new(LastRegisteredWins))
        .build()
        .unwrap();

    let result = resolver.get_value_for(&caller, "db.url", None).unwrap();
    assert_eq!(result.as_deref(), Some("jdbc:experimental"));
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl ResolutionObserver for RecordingObserver {
    fn started(&self, _coordinates: &Coordinates, name: &str) {
        self.events.lock().unwrap().push(format!("started:{name}"));
    }

    fn malformed(&self, _coordinates: &Coordinates, name: &str, bad: &[ConfigurationValue]) {
        self.events.lock().unwrap().push(format!("malformed:{name}:{}", bad.len()));
    }

    fn resolved(&self, _coordinates: &Coordinates, name: &str, selected: &ConfigurationValue) {
        self.events.lock().unwrap().push(format!("resolved:{name}:{}", selected.value().unwrap_or("")));
    }

    fn ambiguous(&self, _coordinates: &Coordinates, name: &str, candidates: &[ConfigurationValue]) {
        self.events.lock().unwrap().push(format!("ambiguous:{name}:{}", candidates.len()));
    }

    fn finished(&self, _coordinates: &Coordinates, name: &str, _duration: std::time::Duration) {
        self.events.lock().unwrap().push(format!("finished:{name}"));
    }
}

#[test]
fn observer_sees_the_full_lifecycle_of_a_successful_resolution() {
    let observer = Arc::new(RecordingObserver::default());
    let resolver = ResolverBuilder::new()
        .with_provider(Arc::new(Fixed { coordinates: Coordinates::new(), name: "db.url", value: "jdbc:test" }))
        .with_observer(observer.clone())
        .build()
        .unwrap();

    resolver.get_value_for(&Coordinates::new(), "db.url", None).unwrap();

    let events = observer.events.lock().unwrap();
    assert_eq!(events.as_slice(), &["started:db.url", "resolved:db.url:jdbc:test", "finished:db.url"]);
}

#[test]
fn observer_sees_malformed_values_discarded_and_an_ambiguous_failure() {
    struct MismatchedName;
    impl Provider for MismatchedName {
        fn name(&self) -> &'static str {
            "mismatched"
        }
        fn lookup(
            &self,
            _resolver: &Resolver,
            _caller_coordinates: &Coordinates,
            _name: &str,
            id: ProviderId,
        ) -> ConfigResult<Option<ConfigurationValue>> {
            Ok(Some(ConfigurationValue::new(id, Coordinates::new(), "wrong.name", Some("ignored".into()), false)))
        }
    }

    let observer = Arc::new(RecordingObserver::default());
    let caller = Coordinates::new().with("region", "west").with("phase", "experimental");
    let resolver = ResolverBuilder::new()
        .with_provider(Arc::new(MismatchedName))
        .with_provider(Arc::new(Fixed { coordinates: Coordinates::new().with("region", "west"), name: "db.url", value: "jdbc:west" }))
        .with_provider(Arc::new(Fixed { coordinates: Coordinates::new().with("phase", "experimental"), name: "db.url", value: "jdbc:experimental" }))
        .with_observer(observer.clone())
        .build()
        .unwrap();

    let err = resolver.get_value_for(&caller, "db.url", None).unwrap_err();
    assert!(matches!(err, locus_config::ConfigError::Ambiguous { .. }));

    let events = observer.events.lock().unwrap();
    assert!(events.contains(&"started:db.url".to_string()));
    assert!(events.contains(&"malformed:db.url:1".to_string()));
    assert!(events.contains(&"ambiguous:db.url:2".to_string()));
    assert!(events.contains(&"finished:db.url".to_string()));
}
