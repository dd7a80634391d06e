//! The mapping engine: walks an object graph and drives a [`JsonGenerator`].
mod container;
mod dynamic;
mod object;
mod primitive;

pub use dynamic::*;

use crate::{
    Adapter, Error, JsonGenerator, JsonPointer, Kind, MapperConfig, MappingSource, ObjectConverter,
    Property, PropertyKind, ReferenceTracker, Result, Value,
};
use std::borrow::Cow;
use std::sync::Arc;

/// The interface offered to whole-object converters and custom class writers for writing a value.
pub trait MappingGenerator {
    /// Writes `value` under `key` in the current object, with the full mapping rules. A `null`
    /// value is left out.
    fn write_object(&mut self, key: &str, value: &Value) -> Result<()>;

    /// Writes `value` without a key.
    fn write_value(&mut self, value: &Value) -> Result<()>;

    /// Gets the token sink, for writing raw JSON.
    fn generator(&mut self) -> &mut dyn JsonGenerator;
}

/// Writes one top-level value to a [`JsonGenerator`], keeping the deduplication state for the
/// duration of the write.
pub(crate) struct MappingWriter<'a> {
    config: &'a MapperConfig,
    mappings: &'a dyn MappingSource,
    generator: &'a mut dyn JsonGenerator,
    tracker: ReferenceTracker,
}

/// What is statically known about the position a value is written to.
#[derive(Clone, Copy)]
pub(crate) struct Declared<'s> {
    kind: PropertyKind,
    item_converter: Option<&'s Arc<dyn Adapter>>,
    object_converter: Option<&'s Arc<dyn ObjectConverter>>,
    ignored: &'s [String],
}

impl Declared<'static> {
    /// A position with no declared type or converters.
    const DYNAMIC: Self = Declared {
        kind: PropertyKind::Dynamic,
        item_converter: None,
        object_converter: None,
        ignored: &[],
    };
}

impl<'s> Declared<'s> {
    fn of(property: &'s Property) -> Self {
        Self {
            kind: property.kind,
            item_converter: property.item_converter.as_ref(),
            object_converter: property.object_converter.as_ref(),
            ignored: &property.ignore_nested,
        }
    }
}

impl<'a> MappingWriter<'a> {
    pub(crate) fn new(
        config: &'a MapperConfig,
        mappings: &'a dyn MappingSource,
        generator: &'a mut dyn JsonGenerator,
        deduplicate: bool,
    ) -> Self {
        Self {
            config,
            mappings,
            generator,
            tracker: ReferenceTracker::new(deduplicate),
        }
    }

    /// Writes a top-level value.
    pub(crate) fn write_root(&mut self, value: &Value) -> Result<()> {
        let root = JsonPointer::root();
        let path = self.tracker.is_enabled().then_some(&root);
        match value {
            Value::Null => self.generator.write_null(None),
            Value::Json(json) => self.generator.write_json(None, json),
            _ => self.write_whole(value, true, &[], path),
        }
    }

    /// Writes a keyed entry of an object that is already open. `path` is the location of the
    /// entry's value.
    pub(crate) fn write_entry(
        &mut self,
        key: &str,
        value: &Value,
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        if let Some(pointer) = self.tracker.lookup(value) {
            return self.generator.write_str(Some(key), pointer);
        }
        self.write_value(key, value, Declared::DYNAMIC, path)
    }

    /// Writes a non-null keyed value, selecting the encoder from its runtime classification and
    /// what is declared about its position.
    pub(crate) fn write_value(
        &mut self,
        key: &str,
        value: &Value,
        declared: Declared<'_>,
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        let config = self.config;
        if let Some(filter) = &config.value_filter {
            if filter.should_ignore(key, value) {
                return Ok(());
            }
        }
        let scalar = match declared.kind {
            PropertyKind::Primitive => true,
            PropertyKind::Dynamic => matches!(value.kind(), Kind::Scalar | Kind::Json),
            _ => false,
        };
        match value {
            Value::Array(array) => self.write_array(
                Some(key),
                array,
                declared.item_converter,
                declared.ignored,
                path,
            ),
            Value::Collection(items) => self.write_collection(key, items, declared, path),
            Value::Map(entries) => {
                self.generator.write_start_object(Some(key))?;
                self.write_map_body(entries, declared.item_converter)?;
                self.generator.write_end()
            }
            _ if scalar => match declared.object_converter {
                Some(converter) => self.convert_with(&**converter, Some(key), value, path),
                None => self.write_scalar(Some(key), value),
            },
            _ => self.write_converted(key, value, declared, path),
        }
    }

    /// Runs a whole-object converter for `value`, at the position given by `key` and `path`.
    pub(crate) fn convert_with(
        &mut self,
        converter: &dyn ObjectConverter,
        key: Option<&str>,
        value: &Value,
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        let type_name = value.type_name();
        tracing::debug!(type_name, key = ?key, "invoking object converter");
        let mut generator = DynamicGenerator::pending(self, key, path);
        converter
            .write_json(value, &mut generator)
            .map_err(|err| err.in_converter(type_name))?;
        generator.finish()
    }
}

/// Applies an adapter, attributing its failure to the type of the input.
fn adapt(adapter: &dyn Adapter, value: &Value) -> Result<Value> {
    tracing::trace!(type_name = value.type_name(), "applying adapter");
    adapter.adapt(value).map_err(|source| Error::Converter {
        type_name: value.type_name(),
        source,
    })
}

/// Applies the item converter, if any, to a non-null item.
fn apply_item<'v>(
    converter: Option<&Arc<dyn Adapter>>,
    item: &'v Value,
) -> Result<Cow<'v, Value>> {
    match converter {
        Some(converter) if !item.is_null() => Ok(Cow::Owned(adapt(&**converter, item)?)),
        _ => Ok(Cow::Borrowed(item)),
    }
}
