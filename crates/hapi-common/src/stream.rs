//! Positional reader over a scrambled byte source.
//!
//! [`ScrambledStream`] keeps its own cursor, so every transformed byte is
//! keyed by the absolute offset it was read from without asking the source
//! where it is.

use std::io::{self, Read, Seek, SeekFrom};

use log::debug;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::{Cipher, Error, Result};

/// A random-access reader that undoes the archive cipher on the fly.
///
/// End of data is reported through short counts and `None`, never as a
/// transformed sentinel byte.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use hapi_common::ScrambledStream;
///
/// let mut stream = ScrambledStream::new(Cursor::new(b"ab\0\x01\x02\x03\x04".to_vec()));
///
/// assert_eq!(stream.read_cstring().unwrap(), "ab");
/// assert_eq!(stream.read_u32_le().unwrap(), 0x04030201);
/// assert_eq!(stream.read_byte().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct ScrambledStream<R> {
    inner: R,
    position: u64,
    cipher: Cipher,
}

impl<R: Read + Seek> ScrambledStream<R> {
    /// Bind to a source positioned at offset 0, with scrambling disabled.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            position: 0,
            cipher: Cipher::DISABLED,
        }
    }

    /// Configure the cipher from a raw header key. Zero disables it.
    pub fn set_key(&mut self, raw_key: u32) {
        self.cipher = Cipher::from_key(raw_key);
        match self.cipher.mask() {
            Some(mask) => debug!("scrambling enabled: key {raw_key:#010x}, mask {mask:#010x}"),
            None => debug!("scrambling disabled"),
        }
    }

    /// The active cipher.
    #[inline]
    pub fn cipher(&self) -> Cipher {
        self.cipher
    }

    /// Current absolute position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total length of the source. Leaves the cursor where it was.
    pub fn source_len(&mut self) -> Result<u64> {
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(self.position))?;
        Ok(end)
    }

    /// Seek to an absolute position.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(position))?;
        self.position = position;
        Ok(())
    }

    /// Read one byte, or `None` at end of data.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        if self.fill(&mut byte)? == 0 {
            return Ok(None);
        }
        let value = self.cipher.apply(self.position, byte[0]);
        self.position += 1;
        Ok(Some(value))
    }

    /// Read as much of `buf` as the source allows from the current position.
    ///
    /// Returns the number of bytes read, which is short only at end of data.
    pub fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize> {
        let start = self.position;
        let read = self.fill(buf)?;
        self.cipher.apply_slice(start, &mut buf[..read]);
        self.position += read as u64;
        Ok(read)
    }

    /// Seek to `offset` and read up to `length` bytes into `buf[..length]`.
    pub fn read_buffer_at(&mut self, buf: &mut [u8], offset: u64, length: usize) -> Result<usize> {
        if buf.len() < length {
            return Err(Error::BufferTooSmall {
                needed: length,
                available: buf.len(),
            });
        }
        self.seek(offset)?;
        self.read_buffer(&mut buf[..length])
    }

    /// Read a little-endian u32 as four consecutive bytes.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        for (i, slot) in bytes.iter_mut().enumerate() {
            *slot = self.read_byte()?.ok_or(Error::UnexpectedEof {
                needed: 4,
                available: i,
            })?;
        }
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a null-terminated string.
    ///
    /// Stops at the first zero byte or at end of data. Names in these
    /// archives are single-byte and are decoded as Latin-1, so distinct raw
    /// names always give distinct strings.
    pub fn read_cstring(&mut self) -> Result<String> {
        let mut name = String::new();
        while let Some(b) = self.read_byte()? {
            if b == 0 {
                break;
            }
            name.push(char::from(b));
        }
        Ok(name)
    }

    /// Read a fixed-layout record at `offset`, unscrambled.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    pub fn read_struct_at<T: FromBytes + KnownLayout + Immutable>(&mut self, offset: u64) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let mut bytes = vec![0u8; size];
        let read = self.read_buffer_at(&mut bytes, offset, size)?;
        if read < size {
            return Err(Error::UnexpectedEof {
                needed: size,
                available: read,
            });
        }
        T::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: read,
        })
    }

    /// Release the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}
