use super::primitive::check_scale;
use super::{MappingGenerator, MappingWriter};
use crate::{GeneratorError, JsonGenerator, JsonPointer, Result, Value};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// The generator handed to a whole-object converter.
///
/// A converter invoked for a keyed value does not know whether it will write a scalar or a set of
/// entries, so the enclosing object for the call-site key is opened lazily:
///  * A keyed write first opens an object under the call-site key; it is closed when the
///    converter finishes (or when the converter ends it explicitly).
///  * A single keyless write becomes the value of the call-site key.
///  * A converter which writes nothing produces an empty object.
///
/// Token sequences that would corrupt the output (writes after the value is complete, closing a
/// container the converter did not open) are reported as [`GeneratorError`]s.
pub struct DynamicGenerator<'w, 'a, 'p> {
    writer: &'w mut MappingWriter<'a>,
    key: Option<&'p str>,
    path: Option<&'p JsonPointer<'p>>,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing has been written.
    Pending,

    /// Entries are being written into an object. `depth` counts the containers opened by the
    /// converter; `owned` is set if the object was opened by this generator.
    Open { depth: usize, owned: bool },

    /// The converter opened the value's container itself.
    Nested { depth: usize },

    /// The value is complete.
    Done,
}

impl<'w, 'a, 'p> DynamicGenerator<'w, 'a, 'p> {
    /// Constructs a generator for the value at `key`, with nothing written yet.
    pub(crate) fn pending(
        writer: &'w mut MappingWriter<'a>,
        key: Option<&'p str>,
        path: Option<&'p JsonPointer<'p>>,
    ) -> Self {
        Self {
            writer,
            key,
            path,
            state: State::Pending,
        }
    }

    /// Constructs a generator positioned inside an object that was opened by the caller.
    pub(crate) fn attached(
        writer: &'w mut MappingWriter<'a>,
        path: Option<&'p JsonPointer<'p>>,
    ) -> Self {
        Self {
            writer,
            key: None,
            path,
            state: State::Open {
                depth: 0,
                owned: false,
            },
        }
    }

    /// Completes the value after the converter returns.
    pub(crate) fn finish(self) -> Result<()> {
        match self.state {
            State::Pending => {
                self.writer.generator.write_start_object(self.key)?;
                self.writer.generator.write_end()
            }
            State::Open {
                depth: 0,
                owned: true,
            } => self.writer.generator.write_end(),
            State::Open {
                depth: 0,
                owned: false,
            }
            | State::Done => Ok(()),
            State::Open { .. } | State::Nested { .. } => Err(GeneratorError::Unclosed.into()),
        }
    }

    /// Prepares for a value written with `key`. Returns `true` if the value takes the place of
    /// the call-site value, and should be written with the call-site key instead.
    fn begin(&mut self, key: Option<&str>, opens: bool) -> Result<bool> {
        match self.state {
            State::Pending if key.is_none() => {
                self.state = if opens {
                    State::Nested { depth: 0 }
                } else {
                    State::Done
                };
                Ok(true)
            }
            State::Pending => {
                self.writer.generator.write_start_object(self.key)?;
                self.state = State::Open {
                    depth: 0,
                    owned: true,
                };
                Ok(false)
            }
            State::Open { .. } | State::Nested { .. } => Ok(false),
            State::Done => Err(GeneratorError::MultipleRoots.into()),
        }
    }

    fn scalar(
        &mut self,
        key: Option<&str>,
        write: impl FnOnce(&mut dyn JsonGenerator, Option<&str>) -> Result<()>,
    ) -> Result<()> {
        let key = if self.begin(key, false)? { self.key } else { key };
        write(&mut *self.writer.generator, key)
    }

    fn start(&mut self, key: Option<&str>, is_object: bool) -> Result<()> {
        let key = if self.begin(key, true)? { self.key } else { key };
        if is_object {
            self.writer.generator.write_start_object(key)?;
        } else {
            self.writer.generator.write_start_array(key)?;
        }
        if let State::Open { depth, .. } | State::Nested { depth } = &mut self.state {
            *depth += 1;
        }
        Ok(())
    }
}

impl MappingGenerator for DynamicGenerator<'_, '_, '_> {
    fn write_object(&mut self, key: &str, value: &Value) -> Result<()> {
        self.begin(Some(key), false)?;
        let child = self.path.map(|path| path.key(key));
        self.writer.write_entry(key, value, child.as_ref())
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        match self.state {
            State::Pending => {
                self.state = State::Done;
                match self.key {
                    Some(key) if value.is_null() => self.writer.generator.write_null(Some(key)),
                    Some(key) => self.writer.write_entry(key, value, self.path),
                    None => self.writer.write_item(value, &[], self.path),
                }
            }
            State::Open { .. } => self.writer.write_whole(value, false, &[], self.path),
            State::Nested { .. } => self.writer.write_item(value, &[], None),
            State::Done => Err(GeneratorError::MultipleRoots.into()),
        }
    }

    fn generator(&mut self) -> &mut dyn JsonGenerator {
        self
    }
}

impl JsonGenerator for DynamicGenerator<'_, '_, '_> {
    fn write_start_object(&mut self, key: Option<&str>) -> Result<()> {
        self.start(key, true)
    }

    fn write_start_array(&mut self, key: Option<&str>) -> Result<()> {
        self.start(key, false)
    }

    fn write_end(&mut self) -> Result<()> {
        match &mut self.state {
            State::Open {
                depth: 0,
                owned: true,
            } => {
                self.writer.generator.write_end()?;
                self.state = State::Done;
                Ok(())
            }
            State::Open { depth, .. } if *depth > 0 => {
                self.writer.generator.write_end()?;
                *depth -= 1;
                Ok(())
            }
            State::Nested { depth } if *depth > 0 => {
                self.writer.generator.write_end()?;
                *depth -= 1;
                if *depth == 0 {
                    self.state = State::Done;
                }
                Ok(())
            }
            _ => Err(GeneratorError::Unbalanced.into()),
        }
    }

    fn write_null(&mut self, key: Option<&str>) -> Result<()> {
        self.scalar(key, |generator, key| generator.write_null(key))
    }

    fn write_bool(&mut self, key: Option<&str>, value: bool) -> Result<()> {
        self.scalar(key, |generator, key| generator.write_bool(key, value))
    }

    fn write_i64(&mut self, key: Option<&str>, value: i64) -> Result<()> {
        self.scalar(key, |generator, key| generator.write_i64(key, value))
    }

    fn write_f32(&mut self, key: Option<&str>, value: f32) -> Result<()> {
        self.scalar(key, |generator, key| generator.write_f32(key, value))
    }

    fn write_f64(&mut self, key: Option<&str>, value: f64) -> Result<()> {
        self.scalar(key, |generator, key| generator.write_f64(key, value))
    }

    fn write_decimal(&mut self, key: Option<&str>, value: &BigDecimal) -> Result<()> {
        check_scale(value, self.writer.config.max_big_decimal_scale)?;
        self.scalar(key, |generator, key| generator.write_decimal(key, value))
    }

    fn write_big_int(&mut self, key: Option<&str>, value: &BigInt) -> Result<()> {
        self.scalar(key, |generator, key| generator.write_big_int(key, value))
    }

    fn write_str(&mut self, key: Option<&str>, value: &str) -> Result<()> {
        self.scalar(key, |generator, key| generator.write_str(key, value))
    }

    fn write_json(&mut self, key: Option<&str>, value: &serde_json::Value) -> Result<()> {
        self.scalar(key, |generator, key| generator.write_json(key, value))
    }
}
