//! Error types for the HAPI archive crate.

use thiserror::Error;

use crate::header::InvalidHeader;

/// Errors that can occur when working with HAPI archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream-level error.
    #[error("{0}")]
    Common(#[from] hapi_common::Error),

    /// The header failed validation.
    #[error("invalid archive header: {0}")]
    InvalidHeader(InvalidHeader),

    /// An entry name is empty, a relative segment, or contains a separator.
    #[error("invalid entry name {name:?} in {parent:?}")]
    InvalidEntryName { parent: String, name: String },

    /// Two entries resolved to the same path.
    #[error("duplicate entry path: {0}")]
    DuplicatePath(String),

    /// Directory nesting exceeded the configured depth.
    #[error("directory nesting deeper than {limit} levels at {path:?}")]
    DirectoryTooDeep { path: String, limit: usize },

    /// The walk discovered more entries than allowed.
    #[error("archive lists more than {0} entries")]
    TooManyEntries(usize),

    /// Entry handle does not belong to this archive.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// Data was requested for a directory.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// Payload uses a compression the decoder cannot handle.
    #[error("unsupported compression: {0}")]
    UnsupportedCompression(crate::CompressionKind),

    /// A [`crate::PayloadDecoder`] could not decode a payload.
    ///
    /// The catalog never decodes anything itself; external decoders report
    /// their failures through this variant.
    #[error("decompression error: {0}")]
    Decompression(String),
}

/// Result type for HAPI archive operations.
pub type Result<T> = std::result::Result<T, Error>;
