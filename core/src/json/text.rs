use super::{JsonGenerator, TextSink};
use crate::{Error, GeneratorError, Result};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// A [`JsonGenerator`] which writes JSON text to a [`TextSink`].
///
/// The generator tracks the open containers so that malformed token sequences (a missing key in
/// an object, a key in an array, an unbalanced end) are reported as errors instead of producing
/// invalid output.
pub struct TextGenerator<Sink: TextSink> {
    sink: Sink,
    config: GeneratorConfig,
    stack: Vec<Container>,
    has_root: bool,
}

/// Encapsulates the configuration options for a [`TextGenerator`].
#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    /// The character sequence used for one indentation level (e.g. "\t" or "    "). If [`None`],
    /// the written JSON will be compact, without any whitespace.
    pub indent: Option<&'static str>,
}

#[allow(clippy::derivable_impls)]
impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { indent: None }
    }
}

impl GeneratorConfig {
    /// A configuration which indents nested values with the given sequence.
    pub fn pretty(indent: &'static str) -> Self {
        Self {
            indent: Some(indent),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Container {
    is_object: bool,
    at_first: bool,
}

impl<Sink: TextSink> TextGenerator<Sink> {
    /// Constructs a new [`TextGenerator`] for writing a single JSON value to a [`TextSink`].
    pub fn new(config: GeneratorConfig, sink: Sink) -> Self {
        Self {
            sink,
            config,
            stack: Vec::new(),
            has_root: false,
        }
    }

    /// Closes the generator and returns the underlying [`TextSink`]. Fails if a container is
    /// still open, or if no value was written.
    pub fn finish(self) -> Result<Sink> {
        if !self.stack.is_empty() {
            return Err(GeneratorError::Unclosed.into());
        }
        if !self.has_root {
            return Err(GeneratorError::Empty.into());
        }
        Ok(self.sink)
    }

    fn raw(&mut self, str: &str) -> Result<()> {
        self.sink.write_raw(str).map_err(Error::sink)
    }

    fn newline(&mut self, depth: usize) -> Result<()> {
        if let Some(indent) = self.config.indent {
            self.raw("\n")?;
            for _ in 0..depth {
                self.raw(indent)?;
            }
        }
        Ok(())
    }

    /// Validates the position of a new value and writes the separator and key preceding it.
    fn begin_value(&mut self, key: Option<&str>) -> Result<()> {
        let depth = self.stack.len();
        let Some(container) = self.stack.last_mut() else {
            if key.is_some() {
                return Err(GeneratorError::UnexpectedKey.into());
            }
            if self.has_root {
                return Err(GeneratorError::MultipleRoots.into());
            }
            self.has_root = true;
            return Ok(());
        };
        match (container.is_object, key) {
            (true, None) => return Err(GeneratorError::ExpectedKey.into()),
            (false, Some(_)) => return Err(GeneratorError::UnexpectedKey.into()),
            _ => (),
        }
        let at_first = std::mem::replace(&mut container.at_first, false);
        if !at_first {
            self.raw(",")?;
        }
        self.newline(depth)?;
        if let Some(key) = key {
            self.write_string(key)?;
            self.raw(if self.config.indent.is_some() { ": " } else { ":" })?;
        }
        Ok(())
    }

    fn open(&mut self, key: Option<&str>, is_object: bool) -> Result<()> {
        self.begin_value(key)?;
        self.stack.push(Container {
            is_object,
            at_first: true,
        });
        self.raw(if is_object { "{" } else { "[" })
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.sink.write_quoted(value).map_err(Error::sink)
    }

    fn write_number(&mut self, value: &dyn std::fmt::Display) -> Result<()> {
        self.sink.write_number(value).map_err(Error::sink)
    }
}

impl<Sink: TextSink> JsonGenerator for TextGenerator<Sink> {
    fn write_start_object(&mut self, key: Option<&str>) -> Result<()> {
        self.open(key, true)
    }

    fn write_start_array(&mut self, key: Option<&str>) -> Result<()> {
        self.open(key, false)
    }

    fn write_end(&mut self) -> Result<()> {
        let container = self.stack.pop().ok_or(GeneratorError::Unbalanced)?;
        if !container.at_first {
            self.newline(self.stack.len())?;
        }
        self.raw(if container.is_object { "}" } else { "]" })
    }

    fn write_null(&mut self, key: Option<&str>) -> Result<()> {
        self.begin_value(key)?;
        self.raw("null")
    }

    fn write_bool(&mut self, key: Option<&str>, value: bool) -> Result<()> {
        self.begin_value(key)?;
        self.raw(if value { "true" } else { "false" })
    }

    fn write_i64(&mut self, key: Option<&str>, value: i64) -> Result<()> {
        self.begin_value(key)?;
        let mut buffer = itoa::Buffer::new();
        self.raw(buffer.format(value))
    }

    fn write_f32(&mut self, key: Option<&str>, value: f32) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::NonFinite(value.into()));
        }
        self.begin_value(key)?;
        let mut buffer = ryu::Buffer::new();
        self.raw(buffer.format_finite(value))
    }

    fn write_f64(&mut self, key: Option<&str>, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::NonFinite(value));
        }
        self.begin_value(key)?;
        let mut buffer = ryu::Buffer::new();
        self.raw(buffer.format_finite(value))
    }

    fn write_decimal(&mut self, key: Option<&str>, value: &BigDecimal) -> Result<()> {
        self.begin_value(key)?;
        self.write_number(value)
    }

    fn write_big_int(&mut self, key: Option<&str>, value: &BigInt) -> Result<()> {
        self.begin_value(key)?;
        self.write_number(value)
    }

    fn write_str(&mut self, key: Option<&str>, value: &str) -> Result<()> {
        self.begin_value(key)?;
        self.write_string(value)
    }
}
