//! Common utilities for HAPI archive reading.
//!
//! This crate provides the low-level pieces every HAPI reader needs:
//!
//! - [`Cipher`] - The positional XOR scrambling applied to archive contents
//! - [`ScrambledStream`] - A positional reader that transparently undoes the cipher

mod cipher;
mod error;
mod stream;

pub use cipher::Cipher;
pub use error::{Error, Result};
pub use stream::ScrambledStream;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
