use crate::{Adapter, ObjectConverter, TypeKey, ValueFilter};
use hashbrown::HashMap;
use std::any::Any;
use std::sync::Arc;

/// How byte arrays are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteArrayEncoding {
    /// A JSON array of numbers.
    #[default]
    Array,
    /// A standard (padded) base64 string.
    Base64,
    /// A URL-safe (padded) base64 string.
    Base64Url,
}

/// Encapsulates the options which affect how a [`Mapper`](crate::Mapper) writes values.
#[derive(Clone)]
pub struct MapperConfig {
    /// Leaves out object properties and map entries whose value is `null`, unless the property
    /// is declared nillable.
    pub skip_null: bool,

    /// Leaves out empty arrays.
    pub skip_empty_array: bool,

    /// How byte arrays are written. Takes precedence over [`MapperConfig::skip_empty_array`].
    pub byte_array_encoding: ByteArrayEncoding,

    /// The version used to filter versioned properties. If [`None`], all properties are written.
    pub version: Option<u32>,

    /// The maximum number of fractional digits (in absolute value) allowed for decimals.
    pub max_big_decimal_scale: u32,

    /// Writes repeated occurrences of a node as a JSON pointer to its first occurrence.
    pub deduplicate_objects: bool,

    /// Decides which keyed values to leave out.
    pub value_filter: Option<Arc<dyn ValueFilter>>,

    /// Adapters and whole-object converters, by the runtime type they apply to.
    pub converters: ConverterRegistry,
}

/// The adapters and whole-object converters registered for runtime types.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    adapters: HashMap<TypeKey, Arc<dyn Adapter>>,
    object_converters: HashMap<TypeKey, Arc<dyn ObjectConverter>>,
}

impl ConverterRegistry {
    /// Registers an adapter for values of type `T`, replacing any previous one.
    pub fn insert_adapter<T: Any>(&mut self, adapter: impl Adapter + 'static) -> &mut Self {
        self.adapters.insert(TypeKey::of::<T>(), Arc::new(adapter));
        self
    }

    /// Registers a whole-object converter for values of type `T`, replacing any previous one.
    pub fn insert_object_converter<T: Any>(
        &mut self,
        converter: impl ObjectConverter + 'static,
    ) -> &mut Self {
        self.object_converters
            .insert(TypeKey::of::<T>(), Arc::new(converter));
        self
    }

    pub fn adapter(&self, type_key: TypeKey) -> Option<&Arc<dyn Adapter>> {
        self.adapters.get(&type_key)
    }

    pub fn object_converter(&self, type_key: TypeKey) -> Option<&Arc<dyn ObjectConverter>> {
        self.object_converters.get(&type_key)
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            skip_null: true,
            skip_empty_array: false,
            byte_array_encoding: ByteArrayEncoding::Array,
            version: None,
            max_big_decimal_scale: 1000,
            deduplicate_objects: false,
            value_filter: None,
            converters: ConverterRegistry::default(),
        }
    }
}

impl MapperConfig {
    /// Registers an adapter for values of type `T`.
    pub fn with_adapter<T: Any>(mut self, adapter: impl Adapter + 'static) -> Self {
        self.converters.insert_adapter::<T>(adapter);
        self
    }

    /// Registers a whole-object converter for values of type `T`.
    pub fn with_object_converter<T: Any>(
        mut self,
        converter: impl ObjectConverter + 'static,
    ) -> Self {
        self.converters.insert_object_converter::<T>(converter);
        self
    }

    /// Sets the value filter.
    pub fn with_value_filter(mut self, filter: impl ValueFilter + 'static) -> Self {
        self.value_filter = Some(Arc::new(filter));
        self
    }

    /// Gets the adapter registered for the given type.
    pub fn find_adapter(&self, type_key: TypeKey) -> Option<&Arc<dyn Adapter>> {
        self.converters.adapter(type_key)
    }

    /// Gets the whole-object converter registered for the given type.
    pub fn find_object_converter(&self, type_key: TypeKey) -> Option<&Arc<dyn ObjectConverter>> {
        self.converters.object_converter(type_key)
    }
}
