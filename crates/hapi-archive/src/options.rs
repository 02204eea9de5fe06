//! Options for opening archives.

use std::io::{Read, Seek};
use std::path::Path;

use crate::archive::{HpiArchive, MappedSource, OpenedArchive};
use crate::Result;

/// Walk limits applied while building the catalog.
///
/// Directory records reference each other by absolute offset, so a damaged
/// archive can describe a cycle. The limits turn that into an error instead
/// of unbounded recursion.
///
/// # Example
///
/// ```no_run
/// use hapi_archive::OpenOptions;
///
/// let opened = OpenOptions::new()
///     .max_depth(16)
///     .max_entries(50_000)
///     .open("totala1.hpi")?;
/// println!("valid: {}", opened.is_valid());
/// # Ok::<(), hapi_archive::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub(crate) max_depth: usize,
    pub(crate) max_entries: usize,
}

impl OpenOptions {
    /// Default maximum directory nesting.
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Highest accepted `max_depth`. The walk recurses once per level, so
    /// larger values are clamped to keep a cyclic archive from exhausting
    /// the stack.
    pub const MAX_DEPTH_LIMIT: usize = 256;

    /// Default maximum number of catalog entries.
    pub const DEFAULT_MAX_ENTRIES: usize = 1 << 20;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    /// Maximum directory nesting below the root, at most
    /// [`OpenOptions::MAX_DEPTH_LIMIT`].
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.min(Self::MAX_DEPTH_LIMIT);
        self
    }

    /// Maximum number of entries in the catalog.
    pub fn max_entries(mut self, count: usize) -> Self {
        self.max_entries = count;
        self
    }

    /// Open an archive file with these options.
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<OpenedArchive<MappedSource>> {
        HpiArchive::<MappedSource>::open_with_options(path, self)
    }

    /// Open an archive over an arbitrary source with these options.
    pub fn from_reader<R: Read + Seek>(self, source: R) -> Result<OpenedArchive<R>> {
        HpiArchive::from_reader_with_options(source, self)
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}
