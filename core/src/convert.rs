use crate::{BoxError, MappingGenerator, Result, Value};

/// A value adapter: converts a domain value into a simpler representation that can be written
/// directly (e.g. an enum into a string). Applied to a property value, to each item of a
/// container, or to a whole instance before its properties are written.
///
/// Adapted values are not stringified. For property values a non-scalar result is written by its
/// own kind (array, collection or map), but an adapted object fails with
/// [`Error::NotScalar`](crate::Error::NotScalar), as does any non-scalar result of an enum
/// adapter. Only a class-level adapter may produce another mapped object.
pub trait Adapter: Send + Sync {
    /// Converts the given value to its written form.
    fn adapt(&self, value: &Value) -> std::result::Result<Value, BoxError>;
}

impl<F> Adapter for F
where
    F: Fn(&Value) -> std::result::Result<Value, BoxError> + Send + Sync,
{
    fn adapt(&self, value: &Value) -> std::result::Result<Value, BoxError> {
        self(value)
    }
}

/// A whole-object converter: writes a JSON fragment for a value itself, replacing property
/// iteration.
///
/// When invoked for a value in a keyed position, the converter receives a
/// [`DynamicGenerator`](crate::DynamicGenerator): keyed writes produce an object under the
/// call-site key, while a single keyless write becomes the value of that key. Class-level custom
/// writers receive a generator positioned inside the already-opened object.
pub trait ObjectConverter: Send + Sync {
    /// Writes the given value.
    fn write_json(&self, value: &Value, generator: &mut dyn MappingGenerator) -> Result<()>;
}

impl<F> ObjectConverter for F
where
    F: Fn(&Value, &mut dyn MappingGenerator) -> Result<()> + Send + Sync,
{
    fn write_json(&self, value: &Value, generator: &mut dyn MappingGenerator) -> Result<()> {
        self(value, generator)
    }
}

/// Decides whether a keyed value should be left out of the output. Consulted before any other
/// rule for property values, map entries and converter-written entries.
pub trait ValueFilter: Send + Sync {
    /// Returns `true` if the entry should not be written.
    fn should_ignore(&self, key: &str, value: &Value) -> bool;
}

impl<F> ValueFilter for F
where
    F: Fn(&str, &Value) -> bool + Send + Sync,
{
    fn should_ignore(&self, key: &str, value: &Value) -> bool {
        self(key, value)
    }
}
