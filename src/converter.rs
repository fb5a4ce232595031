//! Converters: the `String -> T` boundary between raw provider payloads and
//! typed results, plus the registry that looks them up by type.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptor::ConverterDescriptor;
use crate::value::Coordinates;

/// An opaque, equality-comparable token a converter publishes to identify
/// the type it produces.
///
/// Modeled on `std::any::type_name`, the same trick the teacher's `Key` type
/// uses for diagnostics: not a true type-safe identifier (two distinct types
/// could in principle share a name in exotic generic-instantiation cases),
/// but effectively unique for any realistic set of converters, and it costs
/// nothing to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor(&'static str);

impl TypeDescriptor {
    /// Builds a descriptor for `T` from `std::any::type_name::<T>()`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(std::any::type_name::<T>())
    }

    /// Builds a descriptor from an explicit name, for converters that target
    /// a type the registry's caller does not have statically (e.g. a
    /// dynamically-typed host embedding this crate).
    pub const fn named(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `String -> T` conversion function, keyed by the [`TypeDescriptor`] it
/// publishes.
///
/// `convert` receives `None` when the resolver selected no value (or a
/// provider reported presence with no string payload) and must decide what
/// that means for `T` — e.g. a boolean converter might treat absence as
/// `false`, while most converters should simply return `None`.
pub trait Converter<T>: Send + Sync {
    /// The type descriptor this converter publishes into the registry.
    fn type_descriptor(&self) -> TypeDescriptor;

    /// Converts a raw payload (or its absence) into `T`.
    fn convert(&self, value: Option<&str>) -> Option<T>;
}

type ErasedConvert = Arc<dyn Fn(Option<&str>) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// An immutable-after-bootstrap mapping from [`TypeDescriptor`] to converter.
///
/// At most one converter is stored per type: registering a second converter
/// for a type descriptor that already has one is a no-op (first wins). This
/// crate does not consider that an error — see `DESIGN.md` for why the
/// alternative (detect-and-reject) was not chosen.
///
/// # Examples
///
/// ```rust
/// use locus_config::converter::{ConverterRegistry, Converter, TypeDescriptor};
///
/// struct Upper;
/// impl Converter<String> for Upper {
///     fn type_descriptor(&self) -> TypeDescriptor { TypeDescriptor::of::<String>() }
///     fn convert(&self, value: Option<&str>) -> Option<String> {
///         value.map(|s| s.to_uppercase())
///     }
/// }
///
/// let mut registry = ConverterRegistry::new();
/// registry.register(Upper);
/// let result: Option<String> = registry.convert(&TypeDescriptor::of::<String>(), Some("hi"));
/// assert_eq!(result, Some("HI".to_string()));
/// ```
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeDescriptor, ErasedConvert>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self { converters: HashMap::new() }
    }

    /// Registers `converter`. If a converter is already registered for the
    /// same [`TypeDescriptor`], `converter` is discarded and the existing
    /// registration is kept (first wins).
    pub fn register<T, C>(&mut self, converter: C)
    where
        T: Send + Sync + 'static,
        C: Converter<T> + 'static,
    {
        let desc = converter.type_descriptor();
        let converter = Arc::new(converter);
        self.converters.entry(desc).or_insert_with(move || {
            let converter = converter.clone();
            Arc::new(move |raw: Option<&str>| {
                converter
                    .convert(raw)
                    .map(|v| Box::new(v) as Box<dyn Any + Send + Sync>)
            })
        });
    }

    /// Converts `value` using the converter registered for `desc`. Returns
    /// `None` both when no converter is registered and when the registered
    /// converter itself returns `None`; callers who must distinguish "not
    /// registered" from "converted to nothing" should check
    /// [`ConverterRegistry::contains`] first.
    pub fn convert<T: 'static>(&self, desc: &TypeDescriptor, value: Option<&str>) -> Option<T> {
        let erased = self.converters.get(desc)?;
        let boxed = (erased)(value)?;
        boxed.downcast::<T>().ok().map(|b| *b)
    }

    pub fn contains(&self, desc: &TypeDescriptor) -> bool {
        self.converters.contains_key(desc)
    }

    /// All type descriptors with a registered converter.
    pub fn conversion_types(&self) -> std::collections::HashSet<TypeDescriptor> {
        self.converters.keys().copied().collect()
    }

    /// Descriptors for every registered converter, for introspection.
    pub fn descriptors(&self) -> Vec<ConverterDescriptor> {
        self.converters.keys().copied().map(ConverterDescriptor::new).collect()
    }
}

/// Identity passthrough converter for `String`.
///
/// Backs the zero-argument `getValue(name)` overload from the spec, which
/// is defined in terms of "the `String` converter".
pub struct StringConverter;

impl Converter<String> for StringConverter {
    fn type_descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<String>()
    }

    fn convert(&self, value: Option<&str>) -> Option<String> {
        value.map(str::to_string)
    }
}

/// Parses the `"{a=b,c=d}"` syntax used by the reserved
/// `configurationCoordinates` property into a [`Coordinates`] value.
///
/// Malformed input (anything not wrapped in `{` `}`) converts to `None`
/// rather than panicking; an empty body (`"{}"`) converts to an empty
/// [`Coordinates`]. Entries without `=` are skipped.
pub struct MapConverter;

impl Converter<Coordinates> for MapConverter {
    fn type_descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Coordinates>()
    }

    fn convert(&self, value: Option<&str>) -> Option<Coordinates> {
        let raw = value?.trim();
        let body = raw.strip_prefix('{')?.strip_suffix('}')?;
        let mut coords = Coordinates::new();
        for entry in body.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if let Some((k, v)) = entry.split_once('=') {
                coords.insert(k.trim().to_string(), v.trim().to_string());
            }
        }
        Some(coords)
    }
}
