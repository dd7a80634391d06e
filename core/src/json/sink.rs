use std::fmt;

/// A destination for the characters of a JSON document.
pub trait TextSink {
    /// The error raised when the destination rejects output.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Appends text to the document verbatim.
    fn write_raw(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Appends `value` as a quoted JSON string.
    fn write_quoted(&mut self, value: &str) -> Result<(), Self::Error> {
        self.write_raw("\"")?;
        let mut run = 0;
        for (index, ch) in value.char_indices() {
            let escape = match ch {
                '\"' => "\\\"",
                '\\' => "\\\\",
                '\x08' => "\\b",
                '\x0C' => "\\f",
                '\n' => "\\n",
                '\r' => "\\r",
                '\t' => "\\t",
                ch if ch < ' ' => "",
                _ => continue,
            };
            self.write_raw(&value[run..index])?;
            if escape.is_empty() {
                self.write_raw(&format!("\\u{:04x}", ch as u32))?;
            } else {
                self.write_raw(escape)?;
            }
            run = index + ch.len_utf8();
        }
        self.write_raw(&value[run..])?;
        self.write_raw("\"")
    }

    /// Appends the [`Display`](fmt::Display) form of a number.
    fn write_number(&mut self, value: &dyn fmt::Display) -> Result<(), Self::Error> {
        self.write_raw(&value.to_string())
    }
}

impl<T: TextSink + ?Sized> TextSink for &'_ mut T {
    type Error = T::Error;
    fn write_raw(&mut self, text: &str) -> Result<(), Self::Error> {
        (**self).write_raw(text)
    }

    fn write_number(&mut self, value: &dyn fmt::Display) -> Result<(), Self::Error> {
        (**self).write_number(value)
    }
}

impl TextSink for String {
    type Error = std::convert::Infallible;
    fn write_raw(&mut self, text: &str) -> Result<(), Self::Error> {
        self.push_str(text);
        Ok(())
    }

    fn write_number(&mut self, value: &dyn fmt::Display) -> Result<(), Self::Error> {
        use fmt::Write;
        // Formatting into a `String` cannot fail.
        let _ = write!(self, "{value}");
        Ok(())
    }
}

impl TextSink for Vec<u8> {
    type Error = std::convert::Infallible;
    fn write_raw(&mut self, text: &str) -> Result<(), Self::Error> {
        self.extend_from_slice(text.as_bytes());
        Ok(())
    }
}

/// A [`TextSink`] over a [`std::io::Write`], encoding the document as UTF-8. Writes go straight
/// through, so wrap unbuffered destinations in a [`std::io::BufWriter`].
pub struct IoSink<W: std::io::Write>(W);

impl<W: std::io::Write> IoSink<W> {
    pub fn new(dest: W) -> Self {
        Self(dest)
    }

    /// Gets the underlying destination.
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: std::io::Write> TextSink for IoSink<W> {
    type Error = std::io::Error;
    fn write_raw(&mut self, text: &str) -> Result<(), Self::Error> {
        self.0.write_all(text.as_bytes())
    }
}
