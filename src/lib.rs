#![allow(unexpected_cfgs)]

//! Synchronous, zero-copy cursor reads over memory-mapped files.

mod cursor;
mod errors;
mod options;
mod region;
mod utils;

#[cfg(feature = "python")]
mod py;

pub use cursor::MemoryMap;
pub use errors::{BoundsError, MapError, MemoryMapError};
pub use options::{AccessPattern, MapOptions};
pub use region::MappedRegion;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// memory_map._core - memory-mapped file reader.
#[cfg(feature = "python")]
#[pymodule]
fn _core(py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Initialize Rust log -> Python logging bridge
    pyo3_log::init();

    // Exceptions
    m.add("MemoryMapError", py.get_type_bound::<errors::PyMemoryMapError>())?;
    m.add("MapError", py.get_type_bound::<errors::PyMapError>())?;
    m.add("BoundsError", py.get_type_bound::<errors::PyBoundsError>())?;

    m.add_class::<py::PyMemoryMap>()?;

    Ok(())
}
