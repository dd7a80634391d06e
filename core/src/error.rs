use thiserror::Error;

/// A boxed error raised by user-supplied adapters and converters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The result type for mapping operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that aborts a write. After any error, the output written so far is incomplete and
/// should be discarded.
#[derive(Debug, Error)]
pub enum Error {
    /// A composite value's runtime type has no class mapping.
    #[error("no mapping for {type_name}")]
    UnmappedType { type_name: &'static str },

    /// An adapter or whole-object converter failed.
    #[error("converter for {type_name} failed")]
    Converter {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    /// An arbitrary-precision decimal has a scale beyond the configured limit.
    #[error("BigDecimal scale ({scale}) limit exceeds maximum allowed ({limit})")]
    ScaleLimit { scale: i64, limit: u32 },

    /// A floating point value that JSON cannot represent reached the output.
    #[error("non-finite number {0} cannot be written as JSON")]
    NonFinite(f64),

    /// A value which had to be written as a scalar is not one.
    #[error("{type_name} cannot be written as a JSON scalar")]
    NotScalar { type_name: &'static str },

    /// The catch-all property of a class did not produce a map.
    #[error("catch-all property of {type_name} did not produce a map")]
    InvalidAnyProperty { type_name: &'static str },

    /// A property reader was applied to an instance of a different type.
    #[error("property reader for {expected} received {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The output sink rejected a token sequence.
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// The underlying writer failed.
    #[error("failed to write output")]
    Sink(#[source] BoxError),

    /// A failure raised by user code, usually a converter.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Constructs an [`Error::Custom`] with the given message.
    pub fn custom(msg: impl std::fmt::Display) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Wraps a failure of the underlying writer.
    pub fn sink(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Sink(Box::new(err))
    }

    /// Attributes a user-raised error to the converter of the given type. Errors that already
    /// carry a precise cause are passed through.
    pub(crate) fn in_converter(self, type_name: &'static str) -> Self {
        match self {
            Error::Custom(msg) => Error::Converter {
                type_name,
                source: msg.into(),
            },
            err => err,
        }
    }
}

/// Structural misuse detected by a [`JsonGenerator`](crate::JsonGenerator).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorError {
    /// A value was written inside an object without a key.
    #[error("expected an object key")]
    ExpectedKey,

    /// A keyed value was written outside of an object.
    #[error("unexpected key outside of an object")]
    UnexpectedKey,

    /// `write_end` was called with no open container.
    #[error("tried to close more containers than were opened")]
    Unbalanced,

    /// A second value was written at the top level.
    #[error("document already has a root value")]
    MultipleRoots,

    /// The document was finished with open containers.
    #[error("document has unclosed containers")]
    Unclosed,

    /// The document was finished without a value, e.g. because the root was skipped.
    #[error("document has no value")]
    Empty,
}
