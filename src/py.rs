use std::borrow::Cow;

use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyInt, PyTuple};

use crate::cursor::MemoryMap;
use crate::errors::{BoundsError, MemoryMapError};
use crate::options::{AccessPattern, MapOptions};

/// Python-facing wrapper around [`MemoryMap`].
///
/// The mapping lives until `close()` or `__exit__`, whichever comes first,
/// and is otherwise released when the object is collected.
#[pyclass(name = "MemoryMap")]
pub struct PyMemoryMap {
    inner: Option<MemoryMap>,
}

impl PyMemoryMap {
    fn get(&self) -> Result<&MemoryMap, MemoryMapError> {
        self.inner.as_ref().ok_or(MemoryMapError::Closed)
    }

    fn get_mut(&mut self) -> Result<&mut MemoryMap, MemoryMapError> {
        self.inner.as_mut().ok_or(MemoryMapError::Closed)
    }
}

/// Convert an offset or length argument. Any int that does not fit in
/// `usize`, negative or huge, is reported as `err` rather than OverflowError.
fn index_arg(value: &Bound<'_, PyAny>, err: BoundsError) -> PyResult<usize> {
    if !value.is_instance_of::<PyInt>() {
        return Err(PyTypeError::new_err(format!(
            "expected int, got {}",
            value.get_type().name()?
        )));
    }
    value.extract::<usize>().map_err(|_| err.into())
}

#[pymethods]
impl PyMemoryMap {
    #[new]
    #[pyo3(signature = (path, *, access="normal", populate=false))]
    fn new(py: Python<'_>, path: &str, access: &str, populate: bool) -> PyResult<Self> {
        let options = MapOptions::new()
            .access(access.parse::<AccessPattern>()?)
            .populate(populate);

        let map = py.allow_threads(|| MemoryMap::with_options(path, &options))?;
        Ok(PyMemoryMap { inner: Some(map) })
    }

    #[pyo3(name = "getSize")]
    fn get_size(&self) -> PyResult<usize> {
        Ok(self.get()?.size())
    }

    #[pyo3(name = "getPos")]
    fn get_pos(&self) -> PyResult<usize> {
        Ok(self.get()?.pos())
    }

    #[pyo3(name = "setPos")]
    fn set_pos(&mut self, pos: &Bound<'_, PyAny>) -> PyResult<()> {
        let map = self.get_mut()?;
        let pos = index_arg(pos, BoundsError::Position)?;
        map.set_pos(pos)?;
        Ok(())
    }

    fn remaining(&self) -> PyResult<usize> {
        Ok(self.get()?.remaining())
    }

    /// Read `num_bytes` from the current position into a new `bytes` object.
    fn read<'py>(
        &mut self,
        py: Python<'py>,
        num_bytes: &Bound<'_, PyAny>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let map = self.get_mut()?;
        let num_bytes = index_arg(num_bytes, BoundsError::Read)?;
        let data = map.read_slice(num_bytes)?;
        Ok(PyBytes::new_bound(py, data))
    }

    /// Read up to the next occurrence of `delimiter` and skip past it.
    /// Accepts `bytes` or `bytearray`.
    #[pyo3(name = "readUntil")]
    fn read_until<'py>(
        &mut self,
        py: Python<'py>,
        delimiter: Cow<'_, [u8]>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let delimiter: &[u8] = &delimiter;
        let map = self.get_mut()?;
        let match_start = {
            let map = &*map;
            py.allow_threads(|| map.find_delimiter(delimiter))?
        };
        let data = map.take_until(match_start, delimiter.len());
        Ok(PyBytes::new_bound(py, data))
    }

    #[getter]
    fn path(&self) -> PyResult<String> {
        Ok(self.get()?.path().to_string_lossy().into_owned())
    }

    #[getter]
    fn closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Release the mapping. Safe to call more than once.
    fn close(&mut self) {
        self.inner.take();
    }

    fn __len__(&self) -> PyResult<usize> {
        self.get_size()
    }

    fn __repr__(&self) -> String {
        match &self.inner {
            Some(map) => format!(
                "MemoryMap({:?}, pos={}, size={})",
                map.path().to_string_lossy(),
                map.pos(),
                map.size()
            ),
            None => "MemoryMap(closed)".to_string(),
        }
    }

    fn __enter__(slf: PyRef<Self>) -> PyResult<PyRef<Self>> {
        slf.get()?;
        Ok(slf)
    }

    #[pyo3(signature = (*_args))]
    fn __exit__(&mut self, _args: &Bound<'_, PyTuple>) {
        self.close();
    }
}
