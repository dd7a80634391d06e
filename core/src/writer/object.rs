use super::{adapt, Declared, DynamicGenerator, MappingWriter};
use crate::{Error, JsonPointer, PropertyKind, Result, Value};

impl MappingWriter<'_> {
    /// Writes a value without a key. When `write_body` is unset, a composite value's properties
    /// are written into the object that is already open.
    pub(crate) fn write_whole(
        &mut self,
        value: &Value,
        write_body: bool,
        ignored: &[String],
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        if self.write_primitive(None, value)? {
            return Ok(());
        }
        match value {
            Value::Null => return Ok(()),
            Value::Enum(constant) => return self.write_enum(None, constant),
            Value::Array(array) => return self.write_array(None, array, None, ignored, path),
            Value::Collection(items) => return self.write_iterable(items, ignored, path),
            Value::Map(entries) if !write_body => return self.write_map_body(entries, None),
            Value::Map(entries) => {
                self.generator.write_start_object(None)?;
                self.write_map_body(entries, None)?;
                return self.generator.write_end();
            }
            _ => (),
        }
        let config = self.config;
        if write_body {
            let converter = value
                .type_key()
                .and_then(|type_key| config.find_object_converter(type_key));
            if let Some(converter) = converter {
                return self.convert_with(&**converter, None, value, path);
            }
            self.generator.write_start_object(None)?;
        }
        self.write_body(value, ignored, path)?;
        if write_body {
            self.generator.write_end()?;
        }
        Ok(())
    }

    /// Writes the fields of a composite value into the object that is already open.
    pub(crate) fn write_body(
        &mut self,
        value: &Value,
        ignored: &[String],
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        let object = match value {
            Value::Object(object) => object,
            Value::Map(entries) => return self.write_map_body(entries, None),
            _ => {
                return Err(Error::UnmappedType {
                    type_name: value.type_name(),
                })
            }
        };
        if let Some(path) = path {
            self.tracker.record(object, path);
        }
        let type_name = object.type_key().name();
        let mapping = self
            .mappings
            .find_or_create(object.type_key())
            .ok_or(Error::UnmappedType { type_name })?;
        if let Some(writer) = &mapping.writer {
            tracing::debug!(type_name, "invoking custom writer");
            let mut generator = DynamicGenerator::attached(self, path);
            writer
                .write_json(value, &mut generator)
                .map_err(|err| err.in_converter(type_name))?;
            return generator.finish();
        }
        if let Some(adapter) = &mapping.adapter {
            let adapted = adapt(&**adapter, value)?;
            return self.write_body(&adapted, ignored, path);
        }

        let config = self.config;
        let instance = object.as_object();
        for property in &mapping.properties {
            let name: &str = &property.name;
            if ignored.iter().any(|ignored| ignored == name) {
                continue;
            }
            if let (Some(required), Some(version)) = (property.version, config.version) {
                if version < required {
                    continue;
                }
            }
            let raw = property.read(instance)?;
            if let Value::Json(json) = &raw {
                self.generator.write_json(Some(name), json)?;
                continue;
            }
            let value = match &property.converter {
                Some(converter) if !raw.is_null() => adapt(&**converter, &raw)?,
                _ => raw,
            };
            if value.is_null() {
                if !config.skip_null || property.nillable {
                    self.generator.write_null(Some(name))?;
                }
                continue;
            }
            if let Some(pointer) = self.tracker.lookup(&value) {
                self.generator.write_str(Some(name), pointer)?;
                continue;
            }
            let child = path.map(|path| path.key(name));
            self.write_value(name, &value, Declared::of(property), child.as_ref())?;
        }

        if let Some(read) = &mapping.any_property {
            match read(instance)? {
                Value::Map(entries) => self.write_map_body(&entries, None)?,
                Value::Null => (),
                _ => return Err(Error::InvalidAnyProperty { type_name }),
            }
        }
        Ok(())
    }

    /// Writes a keyed value whose declared type is not primitive: through a converter or adapter
    /// when one applies, otherwise as an object of its own.
    pub(crate) fn write_converted(
        &mut self,
        key: &str,
        value: &Value,
        declared: Declared<'_>,
        path: Option<&JsonPointer<'_>>,
    ) -> Result<()> {
        let config = self.config;
        if let Some(converter) = declared.object_converter {
            return self.convert_with(&**converter, Some(key), value, path);
        }
        if let Some(type_key) = value.type_key() {
            if let Some(adapter) = config.find_adapter(type_key) {
                let adapted = adapt(&**adapter, value)?;
                let declared = Declared {
                    kind: PropertyKind::Primitive,
                    ..Declared::DYNAMIC
                };
                return self.write_value(key, &adapted, declared, path);
            }
            if let Value::Enum(constant) = value {
                return self.generator.write_str(Some(key), constant.name());
            }
            if let Some(converter) = config.find_object_converter(type_key) {
                return self.convert_with(&**converter, Some(key), value, path);
            }
        }
        if self.write_primitive(Some(key), value)? {
            return Ok(());
        }
        self.generator.write_start_object(Some(key))?;
        self.write_body(value, declared.ignored, path)?;
        self.generator.write_end()
    }
}
