use std::{error::Error as StdError, fmt};
use thiserror::Error;

/// The kind of range that was requested from an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    /// A forward-only, read-only range.
    SinglePass,
    /// An indexable, read-only range.
    RandomAccess,
    /// An indexable range yielding write-through [`Item`](crate::Item)s.
    MutableRandomAccess,
    /// A range of key/value pairs.
    Mapping,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeKind::SinglePass => "single-pass range",
            RangeKind::RandomAccess => "random-access range",
            RangeKind::MutableRandomAccess => "mutable random-access range",
            RangeKind::Mapping => "mapping range",
        })
    }
}

/// An error that occurs when a foreign value cannot be converted to the
/// requested native type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected value of type {expected}, but got {actual}")]
pub struct ConversionError {
    /// Requested type.
    pub expected: &'static str,
    /// Type name reported by the foreign runtime.
    pub actual: String,
}

impl ConversionError {
    /// Creates a new conversion error.
    pub fn new(expected: &'static str, actual: impl Into<String>) -> Self {
        Self {
            expected,
            actual: actual.into(),
        }
    }
}

/// Errors produced by ranges, cursors and element proxies.
#[derive(Debug, Error)]
pub enum Error {
    /// The object does not provide the capability required by the range.
    #[error("object cannot be adapted as a {0}")]
    BadRange(RangeKind),

    /// An element could not be converted to the requested type.
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// An end cursor, or a cursor moved outside its range, was dereferenced.
    #[error("dereferenced an iterator outside of its range")]
    InvalidIteratorUse,

    /// The foreign runtime raised an error.
    #[error("{0}")]
    Foreign(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// Wraps an error raised by the foreign runtime.
    pub fn foreign<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Error::Foreign(Box::new(err))
    }

    /// Returns the foreign error if this is one and it has the given type.
    pub fn downcast_foreign<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Error::Foreign(err) => err.downcast_ref(),
            _ => None,
        }
    }
}

/// Result type used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bad_range_message_names_kind() {
        assert_eq!(
            Error::BadRange(RangeKind::Mapping).to_string(),
            "object cannot be adapted as a mapping range"
        );
        assert_eq!(
            Error::BadRange(RangeKind::MutableRandomAccess).to_string(),
            "object cannot be adapted as a mutable random-access range"
        );
    }

    #[test]
    fn test_conversion_error() {
        let err: Error = ConversionError::new("int", "str").into();
        assert_eq!(err.to_string(), "expected value of type int, but got str");
        assert!(matches!(err, Error::Conversion(ConversionError { expected: "int", .. })));
    }

    #[test]
    fn test_downcast_foreign() {
        let err = Error::foreign(std::fmt::Error);
        assert!(err.downcast_foreign::<std::fmt::Error>().is_some());
        assert!(Error::InvalidIteratorUse
            .downcast_foreign::<std::fmt::Error>()
            .is_none());
    }
}
