//! On-disk directory structures.
//!
//! All offsets are absolute positions in the archive and every record is read
//! through the scrambled stream.

use std::fmt;

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Directory record.
///
/// Points at a packed list of [`EntryDescriptor`]s.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct DirectoryRecord {
    /// Number of descriptors in the list
    pub entry_count: U32,
    /// Offset of the first descriptor
    pub entry_list_offset: U32,
}

/// One child of a directory.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct EntryDescriptor {
    /// Offset of the null-terminated name
    pub name_offset: U32,
    /// Offset of a [`DirectoryRecord`] or a [`FileRecord`], depending on `flag`
    pub data_offset: U32,
    /// 1 for directories, 0 for files
    pub flag: u8,
}

impl EntryDescriptor {
    /// Size of one descriptor on disk.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Flag value marking a directory.
    pub const FLAG_DIRECTORY: u8 = 1;

    /// Whether the descriptor names a directory.
    #[inline]
    pub fn is_directory(&self) -> bool {
        self.flag == Self::FLAG_DIRECTORY
    }
}

/// Payload location of a file.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct FileRecord {
    /// Offset of the payload bytes
    pub payload_offset: U32,
    /// Length of the payload as stored
    pub payload_length: U32,
    /// Compression tag, see [`CompressionKind`]
    pub compression: u8,
}

/// How a file payload is stored.
///
/// Decoding is left to a [`crate::PayloadDecoder`]; the catalog only reports
/// the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    /// Stored as-is.
    None,
    /// LZ77 chunks.
    Lz77,
    /// Zlib chunks.
    Zlib,
    /// Tag this reader does not know.
    Unknown(u8),
}

impl From<u8> for CompressionKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Lz77,
            2 => Self::Zlib,
            other => Self::Unknown(other),
        }
    }
}

impl From<CompressionKind> for u8 {
    fn from(kind: CompressionKind) -> Self {
        match kind {
            CompressionKind::None => 0,
            CompressionKind::Lz77 => 1,
            CompressionKind::Zlib => 2,
            CompressionKind::Unknown(other) => other,
        }
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Lz77 => f.write_str("lz77"),
            Self::Zlib => f.write_str("zlib"),
            Self::Unknown(tag) => write!(f, "unknown ({tag})"),
        }
    }
}
