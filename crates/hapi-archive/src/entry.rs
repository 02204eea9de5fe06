//! Catalog entries.

use std::fmt;
use std::path::{Path, PathBuf};

/// Stable handle to an entry in an [`crate::HpiArchive`].
///
/// Handles index the catalog's entry sequence, which never changes after the
/// archive is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub(crate) usize);

impl EntryId {
    /// Position of the entry in walk order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A file; the offset points at its file record.
    File,
    /// A directory; the offset points at its directory record.
    Directory,
}

/// An entry (file or directory) within a HAPI archive.
///
/// This contains metadata about the entry, not the file data itself.
/// Use [`crate::HpiArchive::get_data`] to get the actual file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HpiEntry {
    /// Full path, `/`-separated.
    path: String,
    /// Byte index where the local name starts in `path`.
    name_start: usize,
    /// Containing directory, `None` for top-level entries.
    parent: Option<EntryId>,
    kind: EntryKind,
    /// Offset of the directory or file record.
    offset: u32,
}

impl HpiEntry {
    /// Path separator used in full paths.
    pub const SEPARATOR: char = '/';

    pub(crate) fn new(
        parent_path: &str,
        name: &str,
        parent: Option<EntryId>,
        kind: EntryKind,
        offset: u32,
    ) -> Self {
        let path = join_path(parent_path, name);
        let name_start = path.len() - name.len();
        Self {
            path,
            name_start,
            parent,
            kind,
            offset,
        }
    }

    /// Full path within the archive.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Local name (last path segment).
    #[inline]
    pub fn name(&self) -> &str {
        &self.path[self.name_start..]
    }

    /// Path of the containing directory, empty at the top level.
    #[inline]
    pub fn parent_path(&self) -> &str {
        self.path[..self.name_start].trim_end_matches(Self::SEPARATOR)
    }

    /// Handle of the containing directory.
    #[inline]
    pub fn parent(&self) -> Option<EntryId> {
        self.parent
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Offset of the entry's directory or file record.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Get the file extension, if any.
    pub fn extension(&self) -> Option<&str> {
        Path::new(self.name())
            .extension()
            .and_then(|ext| ext.to_str())
    }

    /// Get the relative output path for extraction.
    pub fn output_path(&self) -> PathBuf {
        self.path.split(Self::SEPARATOR).collect()
    }
}

/// Join a parent path and a local name with a single separator.
///
/// The top level has an empty parent and no leading separator.
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        return name.to_string();
    }
    let mut path = String::with_capacity(parent.len() + 1 + name.len());
    path.push_str(parent);
    path.push(HpiEntry::SEPARATOR);
    path.push_str(name);
    path
}

/// Whether a raw name can become a single path segment.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
