//! gzip member parsing and validation (RFC 1952).
//!
//! ## Architecture
//!
//! The module is organized into four components:
//!
//! - [`structures`]: the header record, flag constants and field helpers
//! - `cursor`: a forward-only cursor that tracks the minimum length the
//!   fields read so far require
//! - [`parser`]: fixed header, optional sections and payload location
//! - [`container`]: inflating the payload and checking the trailer
//!
//! ## Member layout
//!
//! ```text
//! +---+---+---+---+---+---+---+---+---+---+
//! |ID1|ID2|CM |FLG|     MTIME     |XFL|OS |   10 bytes, always
//! +---+---+---+---+---+---+---+---+---+---+
//! FEXTRA    SI1 SI2 XLEN(2) content           if FLG.FEXTRA
//! FNAME     name bytes, NUL                   if FLG.FNAME
//! FCOMMENT  comment bytes, NUL                if FLG.FCOMMENT
//! FHCRC     CRC16(2)                          if FLG.FHCRC
//! deflate payload
//! +---+---+---+---+---+---+---+---+
//! |     CRC32     |     ISIZE     |           8 bytes, always
//! +---+---+---+---+---+---+---+---+
//! ```
//!
//! ## Limitations
//!
//! - One member per buffer; the trailer is always the last 8 bytes
//! - Whole-buffer input only, no streaming

pub mod container;
mod cursor;
pub mod parser;
pub mod structures;

pub use container::GzipContainer;
pub use parser::GzipParser;
pub use structures::*;
