use std::fs::File;

use memmap2::{Mmap, MmapOptions};

use crate::options::{AccessPattern, MapOptions};

/// Memory-map a file for read-only access.
///
/// # Safety
/// Mapped bytes only leave the crate as owned copies, so the one hazard is the
/// file changing on disk while mapped. Callers must not truncate or rewrite it.
pub fn mmap_file(file: &File, options: &MapOptions) -> std::io::Result<Mmap> {
    let mut builder = MmapOptions::new();
    if options.populate {
        builder.populate();
    }
    let mmap = unsafe { builder.map(file)? };
    advise(&mmap, options.access);
    Ok(mmap)
}

/// Hint the kernel about the expected access pattern. Advice is best effort.
#[cfg(unix)]
fn advise(mmap: &Mmap, access: AccessPattern) {
    use memmap2::Advice;

    let advice = match access {
        AccessPattern::Normal => return,
        AccessPattern::Sequential => Advice::Sequential,
        AccessPattern::Random => Advice::Random,
    };
    if let Err(e) = mmap.advise(advice) {
        log::warn!("madvise({}) failed, continuing without it: {}", access, e);
    }
}

#[cfg(not(unix))]
fn advise(_mmap: &Mmap, _access: AccessPattern) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_mmap_with_every_access_pattern() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"hello world").unwrap();
        f.flush().unwrap();

        for access in [
            AccessPattern::Normal,
            AccessPattern::Sequential,
            AccessPattern::Random,
        ] {
            let opts = MapOptions::new().access(access).populate(true);
            let mmap = mmap_file(f.as_file(), &opts).unwrap();
            assert_eq!(&mmap[..], b"hello world");
        }
    }
}
