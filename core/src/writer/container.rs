use super::{apply_item, Declared, MappingWriter};
use crate::{Adapter, Array, ByteArrayEncoding, JsonPointer, MapKey, Result, Value};
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use std::sync::Arc;

impl MappingWriter<'_> {
    /// Writes a fixed-length array. Byte arrays may instead be written as a base64 string, which
    /// takes precedence over skipping empty arrays.
    pub(crate) fn write_array(
        &mut self,
        key: Option<&str>,
        array: &Array,
        item_converter: Option<&Arc<dyn Adapter>>,
        ignored: &[String],
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        let config = self.config;
        if let Array::Byte(bytes) = array {
            let encoded = match config.byte_array_encoding {
                ByteArrayEncoding::Array => None,
                ByteArrayEncoding::Base64 => Some(STANDARD.encode(bytes)),
                ByteArrayEncoding::Base64Url => Some(URL_SAFE.encode(bytes)),
            };
            if let Some(encoded) = encoded {
                return self.generator.write_str(key, &encoded);
            }
        }
        if array.is_empty() && config.skip_empty_array {
            return Ok(());
        }
        self.generator.write_start_array(key)?;
        match array {
            Array::Byte(items) => {
                for item in items {
                    self.generator.write_i64(None, (*item).into())?;
                }
            }
            Array::Short(items) => {
                for item in items {
                    self.generator.write_i64(None, (*item).into())?;
                }
            }
            Array::Int(items) => {
                for item in items {
                    self.generator.write_i64(None, (*item).into())?;
                }
            }
            Array::Long(items) => {
                for item in items {
                    self.generator.write_i64(None, *item)?;
                }
            }
            Array::Float(items) => {
                for item in items {
                    self.generator.write_f32(None, *item)?;
                }
            }
            Array::Double(items) => {
                for item in items {
                    self.generator.write_f64(None, *item)?;
                }
            }
            Array::Char(items) => {
                for item in items {
                    self.generator.write_str(None, item.encode_utf8(&mut [0; 4]))?;
                }
            }
            Array::Bool(items) => {
                for item in items {
                    self.generator.write_bool(None, *item)?;
                }
            }
            Array::Boxed(items) => {
                for item in items {
                    let item = apply_item(item_converter, item)?;
                    self.write_item(&item, ignored, None)?;
                }
            }
            Array::Object(items) => {
                for (index, item) in items.iter().enumerate() {
                    if let Some(pointer) = self.tracker.lookup(item) {
                        self.generator.write_str(None, pointer)?;
                        continue;
                    }
                    let item = apply_item(item_converter, item)?;
                    let child = path.map(|path| path.index(index));
                    self.write_item(&item, ignored, child.as_ref())?;
                }
            }
        }
        self.generator.write_end()
    }

    /// Writes a keyed collection. Each item is written through the declared whole-object
    /// converter, or the one registered for its type, or else as a plain item.
    pub(crate) fn write_collection(
        &mut self,
        key: &str,
        items: &[Value],
        declared: Declared<'_>,
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        let config = self.config;
        self.generator.write_start_array(Some(key))?;
        for (index, item) in items.iter().enumerate() {
            if let Some(pointer) = self.tracker.lookup(item) {
                self.generator.write_str(None, pointer)?;
                continue;
            }
            if item.is_null() {
                self.generator.write_null(None)?;
                continue;
            }
            let child = path.map(|path| path.index(index));
            let converter = declared.object_converter.or_else(|| {
                item.type_key()
                    .and_then(|type_key| config.find_object_converter(type_key))
            });
            if let Some(converter) = converter {
                self.convert_with(&**converter, None, item, child.as_ref())?;
            } else {
                let item = apply_item(declared.item_converter, item)?;
                self.write_item(&item, declared.ignored, child.as_ref())?;
            }
        }
        self.generator.write_end()
    }

    /// Writes a collection which is itself an item or the top-level value.
    pub(crate) fn write_iterable(
        &mut self,
        items: &[Value],
        ignored: &[String],
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        self.generator.write_start_array(None)?;
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::Null => self.generator.write_null(None)?,
                Value::Json(json) => self.generator.write_json(None, json)?,
                _ => {
                    let child = path.map(|path| path.index(index));
                    self.write_item(item, ignored, child.as_ref())?;
                }
            }
        }
        self.generator.write_end()
    }

    /// Writes one element of an array or collection.
    pub(crate) fn write_item(
        &mut self,
        value: &Value,
        ignored: &[String],
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        if value.is_null() {
            return self.generator.write_null(None);
        }
        if self.write_primitive(None, value)? {
            return Ok(());
        }
        match value {
            Value::Collection(items) => self.write_iterable(items, ignored, path),
            Value::Array(array) => self.write_array(None, array, None, ignored, path),
            _ => {
                if let Some(pointer) = self.tracker.lookup(value) {
                    return self.generator.write_str(None, pointer);
                }
                self.write_whole(value, true, ignored, path)
            }
        }
    }

    /// Writes the entries of a map into the object that is already open. Map values are not
    /// recorded for deduplication.
    pub(crate) fn write_map_body(
        &mut self,
        entries: &[(MapKey, Value)],
        item_converter: Option<&Arc<dyn Adapter>>,
    ) -> Result<()> {
        let config = self.config;
        for (key, value) in entries {
            let key = key.as_key();
            if value.is_null() {
                if !config.skip_null {
                    self.generator.write_null(Some(&*key))?;
                }
                continue;
            }
            let value = apply_item(item_converter, value)?;
            self.write_value(&key, &value, Declared::DYNAMIC, None)?;
        }
        Ok(())
    }
}
