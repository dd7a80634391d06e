use std::fmt;

/// One step of a [`JsonPointer`].
#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root,
    Key(&'a str),
    Index(usize),
}

/// The location of a value within the document being written, as a chain of segments linked to
/// their parent. Children borrow their parent, so siblings share a prefix without copying it.
/// The chain is rendered as an RFC 6901 pointer (the root is `/`) only when it is recorded.
#[derive(Debug, Clone, Copy)]
pub struct JsonPointer<'a> {
    parent: Option<&'a JsonPointer<'a>>,
    segment: Segment<'a>,
}

impl<'a> JsonPointer<'a> {
    /// The pointer to the document root.
    pub const fn root() -> Self {
        Self {
            parent: None,
            segment: Segment::Root,
        }
    }

    /// The pointer to the entry with the given key in the object at this location.
    pub fn key(&'a self, key: &'a str) -> Self {
        Self {
            parent: Some(self),
            segment: Segment::Key(key),
        }
    }

    /// The pointer to the element with the given index in the array at this location.
    pub fn index(&'a self, index: usize) -> Self {
        Self {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }

    fn write_to(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent {
            parent.write_to(f)?;
        }
        match self.segment {
            Segment::Root => Ok(()),
            Segment::Key(key) => {
                f.write_str("/")?;
                for ch in key.chars() {
                    match ch {
                        '~' => f.write_str("~0")?,
                        '/' => f.write_str("~1")?,
                        ch => fmt::Write::write_char(f, ch)?,
                    }
                }
                Ok(())
            }
            Segment::Index(index) => {
                f.write_str("/")?;
                f.write_str(itoa::Buffer::new().format(index))
            }
        }
    }
}

impl fmt::Display for JsonPointer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parent.is_none() {
            return f.write_str("/");
        }
        self.write_to(f)
    }
}
