//! HAPI archive reader.
//!
//! HAPI archives (`.hpi`, `.ufo`, `.ccx`, `.gp3`) package a game's assets as a
//! tree of directories and files. Everything after the 20-byte header may be
//! scrambled with a positional XOR cipher keyed from the header.
//!
//! Opening an archive:
//!
//! - validates the `HAPI`/`BANK` signatures and the version
//! - keys the stream from the header
//! - walks the directory tree once, producing a flat catalog in depth-first
//!   pre-order
//!
//! File payloads are returned as stored. Compressed payloads stay encoded and
//! are handed to a [`PayloadDecoder`] if the caller has one.
//!
//! # Example
//!
//! ```no_run
//! use hapi_archive::{HpiArchive, OpenedArchive};
//!
//! let mut archive = match HpiArchive::open("totala1.hpi")? {
//!     OpenedArchive::Valid(archive) => archive,
//!     OpenedArchive::Invalid(reason) => {
//!         eprintln!("not an archive: {reason}");
//!         return Ok(());
//!     }
//! };
//!
//! for (_, entry) in archive.iter() {
//!     println!("{}", entry.path());
//! }
//!
//! if let Some(id) = archive.find("units/armcom.fbi") {
//!     let payload = archive.read(id)?;
//!     println!("{} bytes ({})", payload.bytes.len(), payload.compression);
//! }
//! # Ok::<(), hapi_archive::Error>(())
//! ```

mod archive;
mod decode;
mod entry;
mod error;
mod header;
mod options;
pub mod format;

pub use archive::{FileInfo, HpiArchive, MappedArchive, MappedSource, OpenedArchive};
pub use decode::{PayloadDecoder, RawPayload, StoredOnly};
pub use entry::{EntryId, EntryKind, HpiEntry};
pub use error::{Error, Result};
pub use format::CompressionKind;
pub use header::{HapiHeader, InvalidHeader};
pub use options::OpenOptions;
