use std::fs::{self, File};
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::errors::MapError;
use crate::options::MapOptions;
use crate::utils::mmap_file;

/// Sole owner of a read-only file mapping.
///
/// The span is fixed at construction. Zero-length files get no OS mapping at
/// all and behave as an empty region. The mapping is released when the region
/// is dropped.
pub struct MappedRegion {
    mmap: Option<Mmap>,
    len: usize,
    path: PathBuf,
}

impl MappedRegion {
    /// Open `path` and map its full contents.
    pub fn create(path: &Path, options: &MapOptions) -> Result<Self, MapError> {
        let path =
            dunce::canonicalize(path).map_err(|e| MapError::from_open(path.to_path_buf(), e))?;

        let metadata = fs::metadata(&path).map_err(|e| MapError::from_open(path.clone(), e))?;
        if !metadata.is_file() {
            return Err(MapError::NotAFile { path });
        }

        let file = File::open(&path).map_err(|e| MapError::from_open(path.clone(), e))?;

        // Re-read through the handle so the length matches what gets mapped.
        let file_len = file
            .metadata()
            .map_err(|e| MapError::from_open(path.clone(), e))?
            .len();
        let len = usize::try_from(file_len).map_err(|_| MapError::TooLarge {
            path: path.clone(),
            len: file_len,
        })?;

        let mmap = if len == 0 {
            None
        } else {
            let mmap = mmap_file(&file, options).map_err(|source| MapError::Map {
                path: path.clone(),
                source,
            })?;
            Some(mmap)
        };

        log::debug!(
            "mapped {} bytes from {:?} (access={})",
            len,
            path,
            options.access
        );

        Ok(MappedRegion { mmap, len, path })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Canonical path of the mapped file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole mapped span.
    pub(crate) fn bytes(&self) -> &[u8] {
        match &self.mmap {
            Some(mmap) => &mmap[..self.len],
            None => &[],
        }
    }

    /// `count` bytes starting at `offset`. Callers validate the range first.
    pub(crate) fn slice(&self, offset: usize, count: usize) -> &[u8] {
        debug_assert!(offset <= self.len && count <= self.len - offset);
        &self.bytes()[offset..offset + count]
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        if self.mmap.is_some() {
            log::trace!("unmapping {} bytes of {:?}", self.len, self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_length_matches_file() {
        let f = file_with(b"abcd");
        let region = MappedRegion::create(f.path(), &MapOptions::default()).unwrap();
        assert_eq!(region.len(), 4);
        assert!(!region.is_empty());
        assert_eq!(region.bytes(), b"abcd");
    }

    #[test]
    fn test_slice() {
        let f = file_with(b"0123456789");
        let region = MappedRegion::create(f.path(), &MapOptions::default()).unwrap();
        assert_eq!(region.slice(2, 3), b"234");
        assert_eq!(region.slice(10, 0), b"");
        assert_eq!(region.slice(0, 10), b"0123456789");
    }

    #[test]
    fn test_empty_file() {
        let f = NamedTempFile::new().unwrap();
        let region = MappedRegion::create(f.path(), &MapOptions::default()).unwrap();
        assert_eq!(region.len(), 0);
        assert!(region.is_empty());
        assert_eq!(region.slice(0, 0), b"");
    }

    #[test]
    fn test_path_is_canonical() {
        let f = file_with(b"x");
        let region = MappedRegion::create(f.path(), &MapOptions::default()).unwrap();
        assert_eq!(region.path(), dunce::canonicalize(f.path()).unwrap());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");
        let err = MappedRegion::create(&missing, &MapOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, MapError::NotFound { .. }));
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = MappedRegion::create(dir.path(), &MapOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, MapError::NotAFile { .. }));
    }

    #[test]
    fn test_region_outlives_source_handle() {
        let f = file_with(b"still here");
        let path = f.path().to_path_buf();
        let region = MappedRegion::create(&path, &MapOptions::default()).unwrap();
        drop(f);
        assert_eq!(region.bytes(), b"still here");
    }
}
