//! # gzcheck
//!
//! In-memory parser and validator for gzip (RFC 1952) members.
//!
//! Given a complete buffer, gzcheck validates the fixed header and every
//! flag-driven optional section, locates the deflate payload, inflates it
//! through a pluggable raw-inflate collaborator and checks the trailer
//! CRC-32 and size. A buffer is either accepted in full or rejected with
//! the first failed check; nothing partial is ever returned.
//!
//! ## Features
//!
//! - Bounds-checked parsing of FEXTRA, FNAME, FCOMMENT and FHCRC
//! - Little-endian field decoding independent of the host
//! - flate2-backed inflater with an optional output limit
//! - Any `Fn(&[u8]) -> anyhow::Result<Vec<u8>>` works as the inflater
//!
//! ## Example
//!
//! ```
//! use gzcheck::GzipContainer;
//!
//! let member = [
//!     0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03,
//!     0x03, 0x00,
//!     0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
//! ];
//!
//! let container = GzipContainer::parse(&member)?;
//! assert!(container.data().is_empty());
//! assert_eq!(container.header().filename, None);
//! # Ok::<(), gzcheck::GzipError>(())
//! ```

pub mod error;
pub mod gzip;
pub mod inflate;

pub use error::{GzipError, Result};
pub use gzip::{ExtraField, GzipContainer, GzipHeader, GzipParser, OperatingSystem, is_gzip};
pub use inflate::{FlateInflater, Inflate};
