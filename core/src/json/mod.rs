mod sink;
mod text;

use crate::Result;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
pub use sink::*;
pub use text::*;

/// A streaming sink for JSON tokens. Inside an object, every value is written with a key; in
/// arrays and at the top level, values are written without one.
///
/// Implementations are the only component that touches the output stream.
pub trait JsonGenerator {
    /// Opens an object.
    fn write_start_object(&mut self, key: Option<&str>) -> Result<()>;

    /// Opens an array.
    fn write_start_array(&mut self, key: Option<&str>) -> Result<()>;

    /// Closes the innermost open object or array.
    fn write_end(&mut self) -> Result<()>;

    /// Writes a `null` literal.
    fn write_null(&mut self, key: Option<&str>) -> Result<()>;

    /// Writes `true` or `false`.
    fn write_bool(&mut self, key: Option<&str>, value: bool) -> Result<()>;

    /// Writes an integer.
    fn write_i64(&mut self, key: Option<&str>, value: i64) -> Result<()>;

    /// Writes a number. Non-finite values are rejected with
    /// [`Error::NonFinite`](crate::Error::NonFinite).
    fn write_f32(&mut self, key: Option<&str>, value: f32) -> Result<()>;

    /// Writes a number. Non-finite values are rejected with
    /// [`Error::NonFinite`](crate::Error::NonFinite).
    fn write_f64(&mut self, key: Option<&str>, value: f64) -> Result<()>;

    /// Writes an arbitrary-precision decimal number.
    fn write_decimal(&mut self, key: Option<&str>, value: &BigDecimal) -> Result<()>;

    /// Writes an arbitrary-precision integer.
    fn write_big_int(&mut self, key: Option<&str>, value: &BigInt) -> Result<()>;

    /// Writes a string.
    fn write_str(&mut self, key: Option<&str>, value: &str) -> Result<()>;

    /// Writes an already-built JSON value.
    fn write_json(&mut self, key: Option<&str>, value: &serde_json::Value) -> Result<()> {
        match value {
            serde_json::Value::Null => self.write_null(key),
            serde_json::Value::Bool(value) => self.write_bool(key, *value),
            serde_json::Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    self.write_i64(key, value)
                } else if let Some(value) = number.as_u64() {
                    self.write_big_int(key, &BigInt::from(value))
                } else {
                    self.write_f64(key, number.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(value) => self.write_str(key, value),
            serde_json::Value::Array(items) => {
                self.write_start_array(key)?;
                for item in items {
                    self.write_json(None, item)?;
                }
                self.write_end()
            }
            serde_json::Value::Object(entries) => {
                self.write_start_object(key)?;
                for (key, value) in entries {
                    self.write_json(Some(key), value)?;
                }
                self.write_end()
            }
        }
    }
}
