use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to establish a mapping. Only raised at construction.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("path does not exist: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("path is not a regular file: {}", .path.display())]
    NotAFile { path: PathBuf },
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to map {}: {source}", .path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is too large to map on this platform ({len} bytes)", .path.display())]
    TooLarge { path: PathBuf, len: u64 },
}

impl MapError {
    /// Classify an I/O failure hit while opening `path`.
    pub(crate) fn from_open(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => MapError::NotFound { path },
            _ => MapError::Open { path, source },
        }
    }
}

/// A request fell outside `[0, size]`. The cursor is left untouched.
///
/// The messages are fixed strings that existing callers match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("Position out of bounds.")]
    Position,
    #[error("Read out of bounds.")]
    Read,
}

#[derive(Debug, Error)]
pub enum MemoryMapError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error("delimiter must not be empty")]
    EmptyDelimiter,
    #[error("I/O operation on closed memory map.")]
    Closed,
    #[error("{0}")]
    InvalidOption(String),
}

#[cfg(feature = "python")]
mod py {
    use pyo3::create_exception;
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    // Exception hierarchy: all inherit from MemoryMapError
    create_exception!(memory_map._core, MemoryMapError, pyo3::exceptions::PyException);
    create_exception!(memory_map._core, MapError, MemoryMapError);
    create_exception!(memory_map._core, BoundsError, MemoryMapError);

    impl From<super::MemoryMapError> for PyErr {
        fn from(err: super::MemoryMapError) -> PyErr {
            match err {
                super::MemoryMapError::Map(e) => MapError::new_err(e.to_string()),
                super::MemoryMapError::Bounds(e) => BoundsError::new_err(e.to_string()),
                super::MemoryMapError::EmptyDelimiter
                | super::MemoryMapError::Closed
                | super::MemoryMapError::InvalidOption(_) => {
                    PyValueError::new_err(err.to_string())
                }
            }
        }
    }

    impl From<super::MapError> for PyErr {
        fn from(err: super::MapError) -> PyErr {
            super::MemoryMapError::from(err).into()
        }
    }

    impl From<super::BoundsError> for PyErr {
        fn from(err: super::BoundsError) -> PyErr {
            super::MemoryMapError::from(err).into()
        }
    }
}

#[cfg(feature = "python")]
pub use py::{
    BoundsError as PyBoundsError, MapError as PyMapError, MemoryMapError as PyMemoryMapError,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_messages_are_fixed() {
        assert_eq!(BoundsError::Position.to_string(), "Position out of bounds.");
        assert_eq!(BoundsError::Read.to_string(), "Read out of bounds.");
    }

    #[test]
    fn test_umbrella_is_transparent() {
        let err: MemoryMapError = BoundsError::Read.into();
        assert_eq!(err.to_string(), "Read out of bounds.");
    }

    #[test]
    fn test_open_error_classification() {
        let missing = MapError::from_open(
            PathBuf::from("nope"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(missing, MapError::NotFound { .. }));
        assert_eq!(missing.to_string(), "path does not exist: nope");

        let denied = MapError::from_open(
            PathBuf::from("locked"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(denied, MapError::Open { .. }));
        assert!(denied.to_string().starts_with("failed to open locked: "));
    }
}
