use std::fmt;
use std::path::Path;

use memchr::memmem;

use crate::errors::{BoundsError, MapError, MemoryMapError};
use crate::options::MapOptions;
use crate::region::MappedRegion;

/// Cursor-based reader over a memory-mapped file.
///
/// The cursor always stays within `[0, size]`. Every operation either succeeds
/// completely or fails without moving it. Reads hand back owned copies, so no
/// borrow of the mapping escapes.
pub struct MemoryMap {
    region: MappedRegion,
    pos: usize,
}

impl MemoryMap {
    /// Map the file at `path` with default options.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        Self::with_options(path, &MapOptions::default())
    }

    pub fn with_options<P: AsRef<Path>>(path: P, options: &MapOptions) -> Result<Self, MapError> {
        let region = MappedRegion::create(path.as_ref(), options)?;
        Ok(MemoryMap { region, pos: 0 })
    }

    /// Size of the mapped file in bytes.
    pub fn size(&self) -> usize {
        self.region.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the mapping.
    pub fn remaining(&self) -> usize {
        self.size() - self.pos
    }

    pub fn path(&self) -> &Path {
        self.region.path()
    }

    /// Move the cursor. `size()` itself is a valid position (end of file).
    pub fn set_pos(&mut self, pos: usize) -> Result<(), BoundsError> {
        if pos > self.size() {
            return Err(BoundsError::Position);
        }
        self.pos = pos;
        Ok(())
    }

    /// Copy `num_bytes` bytes from the cursor and advance past them.
    pub fn read(&mut self, num_bytes: usize) -> Result<Vec<u8>, BoundsError> {
        self.read_slice(num_bytes).map(<[u8]>::to_vec)
    }

    /// Copy everything up to the first occurrence of `delimiter` and move the
    /// cursor past it. The delimiter itself is not returned.
    pub fn read_until(&mut self, delimiter: &[u8]) -> Result<Vec<u8>, MemoryMapError> {
        let match_start = self.find_delimiter(delimiter)?;
        Ok(self.take_until(match_start, delimiter.len()).to_vec())
    }

    pub(crate) fn read_slice(&mut self, num_bytes: usize) -> Result<&[u8], BoundsError> {
        let start = self.pos;
        let end = start
            .checked_add(num_bytes)
            .filter(|&end| end <= self.size())
            .ok_or(BoundsError::Read)?;
        self.pos = end;
        Ok(self.region.slice(start, num_bytes))
    }

    /// Offset of the leftmost match of `delimiter` at or after the cursor.
    /// Does not move the cursor.
    pub(crate) fn find_delimiter(&self, delimiter: &[u8]) -> Result<usize, MemoryMapError> {
        if delimiter.is_empty() {
            return Err(MemoryMapError::EmptyDelimiter);
        }
        let haystack = &self.region.bytes()[self.pos..];
        memmem::find(haystack, delimiter)
            .map(|offset| self.pos + offset)
            .ok_or(MemoryMapError::Bounds(BoundsError::Read))
    }

    /// Consume `[pos, match_start)` plus a delimiter of `delimiter_len` bytes.
    /// `match_start` must come from `find_delimiter` with the cursor unchanged.
    pub(crate) fn take_until(&mut self, match_start: usize, delimiter_len: usize) -> &[u8] {
        let start = self.pos;
        self.pos = match_start + delimiter_len;
        self.region.slice(start, match_start - start)
    }
}

impl fmt::Debug for MemoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryMap")
            .field("path", &self.path())
            .field("size", &self.size())
            .field("pos", &self.pos)
            .finish()
    }
}
