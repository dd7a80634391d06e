use crate::{Adapter, Error, Object, ObjectConverter, Result, ToValue, TypeKey, Value};
use hashbrown::HashMap;
use std::any::Any;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

/// Reads a property value from an instance.
pub type Reader = Arc<dyn Fn(&dyn Object) -> Result<Value> + Send + Sync>;

/// The declared shape of a property, precomputed from its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A scalar: string, number, boolean or character.
    Primitive,
    Array,
    Collection,
    Map,
    /// A composite object (or an enum) of a statically known type.
    Object,
    /// The declared type does not determine the shape; the runtime value is classified instead.
    Dynamic,
}

/// Describes how one property of a class is read and written.
#[derive(Clone)]
pub struct Property {
    pub(crate) name: Cow<'static, str>,
    pub(crate) reader: Reader,
    pub(crate) kind: PropertyKind,
    pub(crate) version: Option<u32>,
    pub(crate) nillable: bool,
    pub(crate) converter: Option<Arc<dyn Adapter>>,
    pub(crate) item_converter: Option<Arc<dyn Adapter>>,
    pub(crate) object_converter: Option<Arc<dyn ObjectConverter>>,
    pub(crate) ignore_nested: Vec<String>,
}

fn downcast<T: Any>(object: &dyn Object) -> Result<&T> {
    object
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: object.type_key().name(),
        })
}

impl Property {
    /// Constructs a property of `T` which reads the field returned by `field`. The declared
    /// kind is taken from the field type.
    pub fn of<T: Any, V: ToValue + ?Sized>(
        name: impl Into<Cow<'static, str>>,
        field: impl for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    ) -> Self {
        Self::with_reader(
            name,
            V::KIND,
            Arc::new(move |object: &dyn Object| -> Result<Value> {
                Ok(field(downcast::<T>(object)?).to_value())
            }),
        )
    }

    /// Constructs a property of `T` whose value is computed from the instance.
    pub fn computed<T: Any>(
        name: impl Into<Cow<'static, str>>,
        kind: PropertyKind,
        read: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::with_reader(
            name,
            kind,
            Arc::new(move |object: &dyn Object| -> Result<Value> {
                Ok(read(downcast::<T>(object)?))
            }),
        )
    }

    /// Constructs a property from an arbitrary [`Reader`].
    pub fn with_reader(name: impl Into<Cow<'static, str>>, kind: PropertyKind, reader: Reader) -> Self {
        Self {
            name: name.into(),
            reader,
            kind,
            version: None,
            nillable: false,
            converter: None,
            item_converter: None,
            object_converter: None,
            ignore_nested: Vec::new(),
        }
    }

    /// Only writes this property when the configured version is at least `version`.
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Writes `null` for this property even when nulls are skipped.
    pub fn nillable(mut self, nillable: bool) -> Self {
        self.nillable = nillable;
        self
    }

    /// Converts the property value with the given adapter before writing it.
    pub fn converter(mut self, converter: impl Adapter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Converts each item of the property value (an array, collection or map) with the given
    /// adapter.
    pub fn item_converter(mut self, converter: impl Adapter + 'static) -> Self {
        self.item_converter = Some(Arc::new(converter));
        self
    }

    /// Writes the property value with the given whole-object converter.
    pub fn object_converter(mut self, converter: impl ObjectConverter + 'static) -> Self {
        self.object_converter = Some(Arc::new(converter));
        self
    }

    /// Leaves out the given properties of the nested value.
    pub fn ignore_nested<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.ignore_nested.extend(names.into_iter().map(Into::into));
        self
    }

    /// The name of the property in JSON.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared kind of the property.
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Reads the property from the given instance.
    pub fn read(&self, object: &dyn Object) -> Result<Value> {
        (self.reader)(object)
    }
}

/// Describes how instances of one type are written.
#[derive(Clone)]
pub struct ClassMapping {
    pub(crate) type_key: TypeKey,
    pub(crate) properties: Vec<Property>,
    pub(crate) writer: Option<Arc<dyn ObjectConverter>>,
    pub(crate) adapter: Option<Arc<dyn Adapter>>,
    pub(crate) any_property: Option<Reader>,
    pub(crate) deduplicate_objects: Option<bool>,
}

impl ClassMapping {
    /// Constructs an empty mapping for `T`.
    pub fn new<T: Any>() -> Self {
        Self {
            type_key: TypeKey::of::<T>(),
            properties: Vec::new(),
            writer: None,
            adapter: None,
            any_property: None,
            deduplicate_objects: None,
        }
    }

    /// Appends a property. Properties are written in the order they are added.
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Reorders the properties with the given comparator.
    pub fn sort_properties_by(mut self, mut cmp: impl FnMut(&str, &str) -> Ordering) -> Self {
        self.properties.sort_by(|a, b| cmp(&a.name, &b.name));
        self
    }

    /// Writes instances with a custom writer instead of iterating properties. The writer is
    /// positioned inside the instance's object.
    pub fn writer(mut self, writer: impl ObjectConverter + 'static) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    /// Converts instances with the given adapter, then writes the properties of the result.
    pub fn adapter(mut self, adapter: impl Adapter + 'static) -> Self {
        self.adapter = Some(Arc::new(adapter));
        self
    }

    /// Declares a catch-all property: a map whose entries are appended after all named
    /// properties.
    pub fn any_property<T: Any>(mut self, read: impl Fn(&T) -> Value + Send + Sync + 'static) -> Self {
        self.any_property = Some(Arc::new(move |object: &dyn Object| -> Result<Value> {
            Ok(read(downcast::<T>(object)?))
        }));
        self
    }

    /// Overrides whether writes rooted at an instance of this type deduplicate objects.
    pub fn deduplicate_objects(mut self, deduplicate: bool) -> Self {
        self.deduplicate_objects = Some(deduplicate);
        self
    }

    /// The type this mapping describes.
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// The properties of this mapping, in write order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }
}

/// A type whose [`ClassMapping`] is known statically. Usually derived.
pub trait Mapped: Any {
    /// Builds the mapping for this type.
    fn class_mapping() -> ClassMapping;
}

/// A source of [`ClassMapping`]s, looked up by runtime type.
pub trait MappingSource: Send + Sync {
    /// Gets the mapping for the given type, creating it if needed. Returns [`None`] if the type
    /// cannot be mapped.
    fn find_or_create(&self, type_key: TypeKey) -> Option<Arc<ClassMapping>>;
}

/// A registry of [`ClassMapping`]s. Mappings registered through [`Mappings::register`] are built
/// on first use and cached.
#[derive(Default)]
pub struct Mappings {
    factories: HashMap<TypeKey, fn() -> ClassMapping>,
    cache: RwLock<HashMap<TypeKey, Arc<ClassMapping>>>,
}

impl Mappings {
    /// Constructs an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a [`Mapped`] type.
    pub fn register<T: Mapped>(&mut self) -> &mut Self {
        self.factories.insert(TypeKey::of::<T>(), T::class_mapping);
        self
    }

    /// Registers a prebuilt mapping, replacing any existing mapping for its type.
    pub fn insert(&mut self, mapping: ClassMapping) -> &mut Self {
        let cache = self.cache.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(mapping.type_key, Arc::new(mapping));
        self
    }
}

impl MappingSource for Mappings {
    fn find_or_create(&self, type_key: TypeKey) -> Option<Arc<ClassMapping>> {
        {
            let cache = self.cache.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(mapping) = cache.get(&type_key) {
                return Some(mapping.clone());
            }
        }
        let factory = *self.factories.get(&type_key)?;
        let mut cache = self.cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(
            cache
                .entry(type_key)
                .or_insert_with(|| Arc::new(factory()))
                .clone(),
        )
    }
}
