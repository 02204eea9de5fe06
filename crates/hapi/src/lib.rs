//! HAPI - game archive reading library.
//!
//! This crate provides a unified interface to the HAPI crates.
//!
//! # Crates
//!
//! - [`hapi_common`] - Positional cipher and scrambled stream reading
//! - [`hapi_archive`] - Header validation, directory catalog, payload retrieval
//!
//! # Example
//!
//! ```no_run
//! use hapi::prelude::*;
//!
//! let mut archive = HpiArchive::open("totala1.hpi")?.into_valid()?;
//!
//! if let Some(id) = archive.find("gamedata/sidedata.tdf") {
//!     let data = archive.read_decoded(id, &StoredOnly)?;
//!     println!("{} bytes", data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use hapi_archive as archive;
pub use hapi_common as common;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use hapi_archive::{
        CompressionKind, EntryId, EntryKind, HpiArchive, HpiEntry, OpenOptions, OpenedArchive,
        PayloadDecoder, StoredOnly,
    };
    pub use hapi_common::{Cipher, ScrambledStream};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
