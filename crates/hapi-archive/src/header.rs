//! Archive header.
//!
//! The header is five little-endian u32 fields at the very start of the file.
//! It is never scrambled; the key it carries applies to everything after it.

use std::fmt;
use std::io::{Read, Seek};

use hapi_common::ScrambledStream;
use log::debug;

use crate::{Error, Result};

/// Archive header, validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapiHeader {
    /// Primary signature, always [`HapiHeader::MAGIC`]
    pub magic: u32,
    /// Secondary signature, always [`HapiHeader::BANK_MAGIC`]
    pub bank_magic: u32,
    /// Absolute offset of the top-level directory record
    pub directory_offset: u32,
    /// Raw scrambling key, zero when contents are plain
    pub key: u32,
    /// Format version
    pub version: u32,
}

impl HapiHeader {
    /// "HAPI" read as a little-endian u32.
    pub const MAGIC: u32 = 0x49504148;

    /// "BANK" read as a little-endian u32.
    pub const BANK_MAGIC: u32 = 0x4B4E4142;

    /// First-generation archives.
    pub const VERSION_1: u32 = 0x0001_0000;

    /// Second-generation archives.
    pub const VERSION_2: u32 = 0x0002_0000;

    /// Size of the header on disk.
    pub const SIZE: u64 = 20;

    /// Read and validate the header from the start of the stream.
    ///
    /// Signature and version problems come back as [`Error::InvalidHeader`];
    /// anything else is a real I/O failure.
    pub(crate) fn read<R: Read + Seek>(stream: &mut ScrambledStream<R>) -> Result<Self> {
        stream.seek(0)?;

        let mut fields = [0u32; 5];
        for field in &mut fields {
            *field = stream.read_u32_le().map_err(|e| match e {
                hapi_common::Error::UnexpectedEof { .. } => {
                    Error::InvalidHeader(InvalidHeader::Truncated)
                }
                other => Error::Common(other),
            })?;
        }

        let [magic, bank_magic, directory_offset, key, version] = fields;
        let header = Self {
            magic,
            bank_magic,
            directory_offset,
            key,
            version,
        };
        debug!(
            "header: magic {:#010x}, bank {:#010x}, directory at {:#x}, key {:#010x}, version {:#010x}",
            magic, bank_magic, directory_offset, key, version
        );

        header.validate().map_err(Error::InvalidHeader)?;
        Ok(header)
    }

    /// Check signatures and version.
    pub fn validate(&self) -> std::result::Result<(), InvalidHeader> {
        if self.magic != Self::MAGIC {
            return Err(InvalidHeader::BadMagic(self.magic));
        }
        if self.bank_magic != Self::BANK_MAGIC {
            return Err(InvalidHeader::BadBankMagic(self.bank_magic));
        }
        if self.version != Self::VERSION_1 && self.version != Self::VERSION_2 {
            return Err(InvalidHeader::UnsupportedVersion(self.version));
        }
        Ok(())
    }

    /// Whether the archive contents are scrambled.
    #[inline]
    pub fn is_scrambled(&self) -> bool {
        self.key != 0
    }
}

/// Why a header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidHeader {
    /// The source ends before the header does.
    Truncated,
    /// Primary signature mismatch.
    BadMagic(u32),
    /// Secondary signature mismatch.
    BadBankMagic(u32),
    /// Version is neither of the known ones.
    UnsupportedVersion(u32),
}

impl fmt::Display for InvalidHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "file shorter than the {}-byte header", HapiHeader::SIZE),
            Self::BadMagic(actual) => write!(
                f,
                "expected signature {:#010x}, got {actual:#010x}",
                HapiHeader::MAGIC
            ),
            Self::BadBankMagic(actual) => write!(
                f,
                "expected bank signature {:#010x}, got {actual:#010x}",
                HapiHeader::BANK_MAGIC
            ),
            Self::UnsupportedVersion(actual) => write!(f, "unsupported version {actual:#010x}"),
        }
    }
}

impl std::error::Error for InvalidHeader {}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn header_bytes(fields: [u32; 5]) -> Vec<u8> {
        fields.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn read(bytes: Vec<u8>) -> Result<HapiHeader> {
        HapiHeader::read(&mut ScrambledStream::new(Cursor::new(bytes)))
    }

    #[test]
    fn test_signatures_spell_names() {
        assert_eq!(&HapiHeader::MAGIC.to_le_bytes(), b"HAPI");
        assert_eq!(&HapiHeader::BANK_MAGIC.to_le_bytes(), b"BANK");
    }

    #[test]
    fn test_field_order() {
        let bytes = header_bytes([
            HapiHeader::MAGIC,
            HapiHeader::BANK_MAGIC,
            0x1234,
            0xAABBCCDD,
            HapiHeader::VERSION_2,
        ]);
        let header = read(bytes).unwrap();

        assert_eq!(header.directory_offset, 0x1234);
        assert_eq!(header.key, 0xAABBCCDD);
        assert_eq!(header.version, HapiHeader::VERSION_2);
        assert!(header.is_scrambled());
    }

    #[test]
    fn test_rejections() {
        let cases = [
            ([0x50495A48, HapiHeader::BANK_MAGIC, 20, 0, HapiHeader::VERSION_1], InvalidHeader::BadMagic(0x50495A48)),
            ([HapiHeader::MAGIC, 0, 20, 0, HapiHeader::VERSION_1], InvalidHeader::BadBankMagic(0)),
            ([HapiHeader::MAGIC, HapiHeader::BANK_MAGIC, 20, 0, 0x0003_0000], InvalidHeader::UnsupportedVersion(0x0003_0000)),
        ];

        for (fields, expected) in cases {
            match read(header_bytes(fields)) {
                Err(Error::InvalidHeader(reason)) => assert_eq!(reason, expected),
                other => panic!("expected {expected:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_truncated() {
        let mut bytes = header_bytes([HapiHeader::MAGIC, HapiHeader::BANK_MAGIC, 20, 0, HapiHeader::VERSION_1]);
        bytes.truncate(13);

        assert!(matches!(read(bytes), Err(Error::InvalidHeader(InvalidHeader::Truncated))));
    }
}
