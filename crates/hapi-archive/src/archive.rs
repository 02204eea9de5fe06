//! HAPI archive catalog.
//!
//! Opening an archive validates the header, keys the stream, and walks the
//! whole directory tree once. Entries live in a single arena in depth-first
//! pre-order and are addressed by [`EntryId`].

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use hapi_common::ScrambledStream;
use log::{info, trace, warn};
use memmap2::Mmap;
use rustc_hash::FxHashSet;

use crate::decode::{PayloadDecoder, RawPayload};
use crate::entry::{is_valid_name, EntryId, EntryKind, HpiEntry};
use crate::format::{DirectoryRecord, EntryDescriptor, FileRecord};
use crate::header::{HapiHeader, InvalidHeader};
use crate::{CompressionKind, Error, OpenOptions, Result};

/// Source type used for archives opened by path.
pub type MappedSource = Cursor<Mmap>;

/// Archive opened from a file on disk.
pub type MappedArchive = HpiArchive<MappedSource>;

/// Outcome of opening an archive.
///
/// A source that is not a HAPI archive is not an error: it opens as
/// [`OpenedArchive::Invalid`] with an empty catalog.
#[derive(Debug)]
pub enum OpenedArchive<R> {
    /// Header accepted and directory fully walked.
    Valid(HpiArchive<R>),
    /// Header rejected; nothing was walked.
    Invalid(InvalidHeader),
}

impl<R> OpenedArchive<R> {
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The archive, if the header was accepted.
    pub fn valid(&self) -> Option<&HpiArchive<R>> {
        match self {
            Self::Valid(archive) => Some(archive),
            Self::Invalid(_) => None,
        }
    }

    /// Mutable access to the archive, if the header was accepted.
    pub fn valid_mut(&mut self) -> Option<&mut HpiArchive<R>> {
        match self {
            Self::Valid(archive) => Some(archive),
            Self::Invalid(_) => None,
        }
    }

    /// The catalog entries; empty when invalid.
    pub fn entries(&self) -> &[HpiEntry] {
        match self {
            Self::Valid(archive) => archive.entries(),
            Self::Invalid(_) => &[],
        }
    }

    /// Convert into the archive, turning a rejected header into an error.
    pub fn into_valid(self) -> Result<HpiArchive<R>> {
        match self {
            Self::Valid(archive) => Ok(archive),
            Self::Invalid(reason) => Err(Error::InvalidHeader(reason)),
        }
    }
}

/// Location of a file's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    /// Absolute offset of the stored bytes
    pub payload_offset: u32,
    /// Number of stored bytes
    pub payload_length: u32,
    /// Compression tag
    pub compression: CompressionKind,
}

/// HAPI archive reader.
///
/// Owns its stream; every read moves the stream cursor and therefore takes
/// `&mut self`. Open a second archive over the same file for parallel reads.
pub struct HpiArchive<R> {
    stream: ScrambledStream<R>,
    header: HapiHeader,
    name: String,
    entries: Vec<HpiEntry>,
    /// Length of the underlying source, bounds payload allocations.
    source_len: u64,
}

impl HpiArchive<MappedSource> {
    /// Open an archive file with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<OpenedArchive<MappedSource>> {
        Self::open_with_options(path, OpenOptions::default())
    }

    /// Open an archive file.
    pub fn open_with_options<P: AsRef<Path>>(
        path: P,
        options: OpenOptions,
    ) -> Result<OpenedArchive<MappedSource>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mut opened = Self::from_reader_with_options(Cursor::new(mmap), options)?;
        if let OpenedArchive::Valid(archive) = &mut opened {
            archive.name = name;
        }
        Ok(opened)
    }
}

impl<R: Read + Seek> HpiArchive<R> {
    /// Open an archive over any seekable source with default options.
    pub fn from_reader(source: R) -> Result<OpenedArchive<R>> {
        Self::from_reader_with_options(source, OpenOptions::default())
    }

    /// Open an archive over any seekable source.
    pub fn from_reader_with_options(source: R, options: OpenOptions) -> Result<OpenedArchive<R>> {
        let mut stream = ScrambledStream::new(source);

        let header = match HapiHeader::read(&mut stream) {
            Ok(header) => header,
            Err(Error::InvalidHeader(reason)) => {
                warn!("not a HAPI archive: {reason}");
                return Ok(OpenedArchive::Invalid(reason));
            }
            Err(e) => return Err(e),
        };

        stream.set_key(header.key);

        let mut walker = Walker {
            stream: &mut stream,
            options,
            entries: Vec::new(),
            seen: FxHashSet::default(),
        };
        walker.walk_children("", None, header.directory_offset, 0)?;
        let entries = walker.entries;
        let source_len = stream.source_len()?;

        info!(
            "catalog built: {} entries ({} directories)",
            entries.len(),
            entries.iter().filter(|e| e.is_dir()).count()
        );

        Ok(OpenedArchive::Valid(Self {
            stream,
            header,
            name: String::from("unknown"),
            entries,
            source_len,
        }))
    }

    /// Read the file record of a file entry.
    pub fn file_info(&mut self, id: EntryId) -> Result<FileInfo> {
        let entry = self.file_entry(id)?;
        let offset = entry.offset() as u64;
        let record: FileRecord = self.stream.read_struct_at(offset)?;

        Ok(FileInfo {
            payload_offset: record.payload_offset.get(),
            payload_length: record.payload_length.get(),
            compression: CompressionKind::from(record.compression),
        })
    }

    /// Copy an entry's stored payload into `buf`.
    ///
    /// `buf` must hold at least the declared payload length; a smaller buffer
    /// is rejected before anything is read. Returns the number of bytes
    /// copied, which is short only if the archive itself is truncated.
    /// Compressed payloads are copied still encoded.
    pub fn get_data(&mut self, id: EntryId, buf: &mut [u8]) -> Result<usize> {
        let info = self.file_info(id)?;
        let length = info.payload_length as usize;
        if buf.len() < length {
            return Err(hapi_common::Error::BufferTooSmall {
                needed: length,
                available: buf.len(),
            }
            .into());
        }

        self.copy_payload(id, &info, &mut buf[..length])
    }

    /// Read an entry's stored payload into a new buffer.
    ///
    /// The buffer never exceeds what the source can still provide, whatever
    /// length the file record declares.
    pub fn read(&mut self, id: EntryId) -> Result<RawPayload> {
        let info = self.file_info(id)?;
        let available = self.source_len.saturating_sub(info.payload_offset as u64);
        let length = u64::from(info.payload_length).min(available) as usize;

        let mut bytes = vec![0u8; length];
        let read = self.copy_payload(id, &info, &mut bytes)?;
        bytes.truncate(read);

        Ok(RawPayload {
            compression: info.compression,
            bytes,
        })
    }

    /// Read an entry and pass it through a decoder.
    pub fn read_decoded<D: PayloadDecoder + ?Sized>(
        &mut self,
        id: EntryId,
        decoder: &D,
    ) -> Result<Vec<u8>> {
        let payload = self.read(id)?;
        decoder.decode(payload.compression, payload.bytes)
    }

    /// Release the underlying source.
    pub fn into_inner(self) -> R {
        self.stream.into_inner()
    }

    /// Fill `buf` from the payload described by `info`.
    fn copy_payload(&mut self, id: EntryId, info: &FileInfo, buf: &mut [u8]) -> Result<usize> {
        let length = buf.len();
        let read = self
            .stream
            .read_buffer_at(buf, info.payload_offset as u64, length)?;

        let declared = info.payload_length as usize;
        if read < declared {
            warn!(
                "{}: payload truncated, {read} of {declared} bytes",
                self.entries[id.0].path()
            );
        }
        Ok(read)
    }
}

impl<R> HpiArchive<R> {
    /// Get the archive name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn header(&self) -> &HapiHeader {
        &self.header
    }

    /// Get the number of entries.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// All entries in walk order.
    #[inline]
    pub fn entries(&self) -> &[HpiEntry] {
        &self.entries
    }

    /// Iterate over entries with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &HpiEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (EntryId(i), e))
    }

    /// Get entry by handle.
    #[inline]
    pub fn entry(&self, id: EntryId) -> Option<&HpiEntry> {
        self.entries.get(id.0)
    }

    /// Find an entry by path (case-insensitive, either separator).
    pub fn find(&self, path: &str) -> Option<EntryId> {
        let normalized = path.replace('\\', "/");
        let normalized = normalized.trim_matches('/');
        self.entries
            .iter()
            .position(|e| e.path().eq_ignore_ascii_case(normalized))
            .map(EntryId)
    }

    /// Entries directly under the archive root.
    pub fn root_entries(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.children_of(None)
    }

    /// Entries directly inside a directory.
    pub fn children(&self, id: EntryId) -> impl Iterator<Item = EntryId> + '_ {
        self.children_of(Some(id))
    }

    fn children_of(&self, parent: Option<EntryId>) -> impl Iterator<Item = EntryId> + '_ {
        self.iter()
            .filter(move |(_, e)| e.parent() == parent)
            .map(|(id, _)| id)
    }

    fn file_entry(&self, id: EntryId) -> Result<&HpiEntry> {
        let entry = self
            .entries
            .get(id.0)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
        if !entry.is_file() {
            return Err(Error::NotAFile(entry.path().to_string()));
        }
        Ok(entry)
    }
}

impl<R> std::fmt::Debug for HpiArchive<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HpiArchive")
            .field("name", &self.name)
            .field("version", &format_args!("{:#010x}", self.header.version))
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Directory walk state. Lives only for the duration of `open`.
struct Walker<'a, R> {
    stream: &'a mut ScrambledStream<R>,
    options: OpenOptions,
    entries: Vec<HpiEntry>,
    seen: FxHashSet<String>,
}

impl<R: Read + Seek> Walker<'_, R> {
    /// Append a directory entry, then walk its contents.
    fn walk_directory(
        &mut self,
        parent_path: &str,
        parent: Option<EntryId>,
        name: &str,
        offset: u32,
        depth: usize,
    ) -> Result<EntryId> {
        let id = self.push(HpiEntry::new(
            parent_path,
            name,
            parent,
            EntryKind::Directory,
            offset,
        ))?;
        let path = self.entries[id.0].path().to_string();
        self.walk_children(&path, Some(id), offset, depth + 1)?;
        Ok(id)
    }

    /// Append a file entry.
    fn walk_file(
        &mut self,
        parent_path: &str,
        parent: Option<EntryId>,
        name: &str,
        offset: u32,
    ) -> Result<EntryId> {
        self.push(HpiEntry::new(
            parent_path,
            name,
            parent,
            EntryKind::File,
            offset,
        ))
    }

    /// Walk every descriptor of the directory record at `offset`.
    fn walk_children(
        &mut self,
        path: &str,
        parent: Option<EntryId>,
        offset: u32,
        depth: usize,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::DirectoryTooDeep {
                path: path.to_string(),
                limit: self.options.max_depth,
            });
        }

        let record: DirectoryRecord = self.stream.read_struct_at(offset as u64)?;
        let count = record.entry_count.get() as u64;
        let list_offset = record.entry_list_offset.get() as u64;
        trace!("directory {path:?} at {offset:#x}: {count} entries");

        for i in 0..count {
            let descriptor: EntryDescriptor = self
                .stream
                .read_struct_at(list_offset + i * EntryDescriptor::SIZE)?;

            self.stream.seek(descriptor.name_offset.get() as u64)?;
            let name = self.stream.read_cstring()?;
            if !is_valid_name(&name) {
                return Err(Error::InvalidEntryName {
                    parent: path.to_string(),
                    name,
                });
            }

            let data_offset = descriptor.data_offset.get();
            if descriptor.is_directory() {
                self.walk_directory(path, parent, &name, data_offset, depth)?;
            } else {
                self.walk_file(path, parent, &name, data_offset)?;
            }
        }

        Ok(())
    }

    fn push(&mut self, entry: HpiEntry) -> Result<EntryId> {
        if self.entries.len() >= self.options.max_entries {
            return Err(Error::TooManyEntries(self.options.max_entries));
        }
        if !self.seen.insert(entry.path().to_string()) {
            return Err(Error::DuplicatePath(entry.path().to_string()));
        }

        trace!("{:?} {} at {:#x}", entry.kind(), entry.path(), entry.offset());
        let id = EntryId(self.entries.len());
        self.entries.push(entry);
        Ok(id)
    }
}
