//! Boundary to payload decompression.
//!
//! The catalog hands out payloads exactly as stored. Anything that can undo
//! LZ77 or zlib chunking plugs in through [`PayloadDecoder`].

use crate::{CompressionKind, Error, Result};

/// Raw payload bytes together with their compression tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload {
    /// How the bytes are encoded
    pub compression: CompressionKind,
    /// Bytes as stored, already unscrambled
    pub bytes: Vec<u8>,
}

impl RawPayload {
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.compression != CompressionKind::None
    }
}

/// Turns a stored payload into file contents.
///
/// Implementations report malformed input as [`Error::Decompression`] and
/// tags they do not handle as [`Error::UnsupportedCompression`].
pub trait PayloadDecoder {
    /// Decode `raw`, whose encoding is `kind`.
    fn decode(&self, kind: CompressionKind, raw: Vec<u8>) -> Result<Vec<u8>>;
}

impl<F> PayloadDecoder for F
where
    F: Fn(CompressionKind, Vec<u8>) -> Result<Vec<u8>>,
{
    fn decode(&self, kind: CompressionKind, raw: Vec<u8>) -> Result<Vec<u8>> {
        self(kind, raw)
    }
}

/// Decoder that accepts stored payloads only.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredOnly;

impl PayloadDecoder for StoredOnly {
    fn decode(&self, kind: CompressionKind, raw: Vec<u8>) -> Result<Vec<u8>> {
        match kind {
            CompressionKind::None => Ok(raw),
            other => Err(Error::UnsupportedCompression(other)),
        }
    }
}
