use super::{adapt, MappingWriter};
use crate::{EnumConstant, Error, Result, Value};
use bigdecimal::BigDecimal;

impl MappingWriter<'_> {
    /// Writes `value` if it is a scalar or an already-built JSON value, returning whether it was
    /// handled. `NaN` counts as handled, but nothing is written for it.
    pub(crate) fn write_primitive(&mut self, key: Option<&str>, value: &Value) -> Result<bool> {
        let limit = self.config.max_big_decimal_scale;
        let generator = &mut *self.generator;
        match value {
            Value::String(value) => generator.write_str(key, value)?,
            Value::Json(value) => generator.write_json(key, value)?,
            Value::Long(value) => generator.write_i64(key, *value)?,
            Value::Int(value) => generator.write_i64(key, (*value).into())?,
            Value::Short(value) => generator.write_i64(key, (*value).into())?,
            Value::Byte(value) => generator.write_i64(key, (*value).into())?,
            Value::Double(value) => {
                if !value.is_nan() {
                    generator.write_f64(key, *value)?
                }
            }
            Value::Float(value) => {
                if !value.is_nan() {
                    generator.write_f32(key, *value)?
                }
            }
            Value::Bool(value) => generator.write_bool(key, *value)?,
            Value::Decimal(value) => {
                check_scale(value, limit)?;
                generator.write_decimal(key, value)?
            }
            Value::BigInt(value) => generator.write_big_int(key, value)?,
            Value::Char(value) => generator.write_str(key, value.encode_utf8(&mut [0; 4]))?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Writes a value in a position declared as primitive. Enums are written by name (or through
    /// their adapter); composite values are rejected.
    pub(crate) fn write_scalar(&mut self, key: Option<&str>, value: &Value) -> Result<()> {
        if self.write_primitive(key, value)? {
            return Ok(());
        }
        match value {
            Value::Null => self.generator.write_null(key),
            Value::Enum(constant) => self.write_enum(key, constant),
            _ => Err(Error::NotScalar {
                type_name: value.type_name(),
            }),
        }
    }

    /// Writes an enum constant: through the adapter registered for its type, or by name.
    pub(crate) fn write_enum(&mut self, key: Option<&str>, constant: &EnumConstant) -> Result<()> {
        let config = self.config;
        let Some(adapter) = config.find_adapter(constant.type_key()) else {
            return self.generator.write_str(key, constant.name());
        };
        let adapted = adapt(&**adapter, &Value::Enum(*constant))?;
        if self.write_primitive(key, &adapted)? {
            return Ok(());
        }
        match adapted {
            Value::Null => self.generator.write_null(key),
            Value::Enum(other) => self.generator.write_str(key, other.name()),
            other => Err(Error::NotScalar {
                type_name: other.type_name(),
            }),
        }
    }
}

/// Rejects decimals with more fractional digits (in absolute value) than `limit`.
pub(super) fn check_scale(value: &BigDecimal, limit: u32) -> Result<()> {
    let (_, scale) = value.as_bigint_and_exponent();
    if scale.unsigned_abs() > u64::from(limit) {
        return Err(Error::ScaleLimit { scale, limit });
    }
    Ok(())
}
