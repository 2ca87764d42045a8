//! Member header parser.
//!
//! Reads the fixed 10-byte header, then the optional sections in wire
//! order (FEXTRA, FNAME, FCOMMENT, FHCRC), and finally works out where the
//! deflate payload sits between the header and the 8-byte trailer.
//!
//! All multi-byte integers are little-endian on the wire regardless of the
//! host byte order.

use std::ops::Range;

use log::trace;

use crate::error::{GzipError, Result};

use super::cursor::ByteCursor;
use super::structures::*;

/// Low-level gzip header parser.
///
/// Usually driven by [`GzipContainer`](super::GzipContainer), but usable on
/// its own to inspect a header without inflating the payload.
///
/// ## Example
///
/// ```
/// use gzcheck::GzipParser;
///
/// let member = [
///     0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0x03, // header
///     0x03, 0x00, // empty deflate block
///     0, 0, 0, 0, 0, 0, 0, 0, // crc32, isize
/// ];
/// let (header, payload) = GzipParser::new(&member).parse()?;
/// assert_eq!(header.os, 3);
/// assert_eq!(payload, 10..12);
/// # Ok::<(), gzcheck::GzipError>(())
/// ```
pub struct GzipParser<'a> {
    cursor: ByteCursor<'a>,
}

impl<'a> GzipParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
        }
    }

    /// Parse the whole header and locate the compressed payload.
    ///
    /// # Returns
    ///
    /// The header and the byte range of the deflate payload within the input.
    ///
    /// # Errors
    ///
    /// The first failed check, in wire order.
    pub fn parse(mut self) -> Result<(GzipHeader, Range<usize>)> {
        let mut header = self.read_fixed_header()?;

        if header.flags & FEXTRA != 0 {
            header.extra_field = Some(self.read_extra_field()?);
        }
        if header.flags & FNAME != 0 {
            header.filename = Some(self.read_terminated("filename")?);
        }
        if header.flags & FCOMMENT != 0 {
            header.comment = Some(self.read_terminated("comment")?);
        }
        if header.flags & FHCRC != 0 {
            self.verify_header_crc()?;
        }

        let payload = self.locate_payload()?;
        Ok((header, payload))
    }

    /// Bytes 0-9: magic, CM, FLG, MTIME, XFL, OS.
    fn read_fixed_header(&mut self) -> Result<GzipHeader> {
        // Length first, so nothing is read from a short buffer
        self.cursor.check()?;

        if self.cursor.read_bytes(SIGNATURE.len())? != SIGNATURE {
            return Err(GzipError::BadMagic);
        }

        let flags = self.cursor.read_u8()?;
        if flags & FRESERVED != 0 {
            return Err(GzipError::ReservedFlagSet(flags & FRESERVED));
        }

        let modification_time = self.cursor.read_i32_le()?;
        let extra_flags = self.cursor.read_u8()?;
        let os = self.cursor.read_u8()?;

        Ok(GzipHeader {
            flags,
            modification_time,
            extra_flags,
            os,
            extra_field: None,
            filename: None,
            comment: None,
        })
    }

    /// FEXTRA: SI1, SI2, a 2-byte length, then that many content bytes.
    fn read_extra_field(&mut self) -> Result<ExtraField> {
        let si1 = self.cursor.read_u8()?;
        let si2 = self.cursor.read_u8()?;
        if si2 == 0 {
            return Err(GzipError::ReservedSubfieldId { si1 });
        }

        let len = usize::from(self.cursor.read_u16_le()?);
        // ids and length are part of the section too
        self.cursor.require(len + 4)?;
        let content = self.cursor.read_bytes(len)?.to_vec();

        trace!("FEXTRA subfield ({si1:#04x}, {si2:#04x}), {len} bytes");
        Ok(ExtraField { si1, si2, content })
    }

    /// FNAME / FCOMMENT: bytes up to the first NUL, terminator excluded.
    fn read_terminated(&mut self, field: &'static str) -> Result<Vec<u8>> {
        let len = self
            .cursor
            .remaining()
            .iter()
            .position(|&b| b == 0)
            .ok_or(GzipError::UnterminatedField(field))?;

        self.cursor.require(len + 1)?;
        let value = self.cursor.read_bytes(len)?.to_vec();
        self.cursor.skip(1)?;

        trace!("{field}: {len} bytes");
        Ok(value)
    }

    /// FHCRC: low 16 bits of the CRC-32 of every header byte before it.
    fn verify_header_crc(&mut self) -> Result<()> {
        self.cursor.require(2)?;
        let computed = (crc32fast::hash(self.cursor.consumed()) & 0xFFFF) as u16;
        let stored = self.cursor.read_u16_le()?;
        if stored != computed {
            return Err(GzipError::HeaderChecksumMismatch { stored, computed });
        }

        trace!("FHCRC {stored:#06x} ok");
        Ok(())
    }

    /// Everything between the header and the trailer.
    fn locate_payload(&self) -> Result<Range<usize>> {
        let start = self.cursor.position();
        let end = self
            .cursor
            .len()
            .checked_sub(TRAILER_SIZE)
            .filter(|&end| end >= start)
            .ok_or(GzipError::TooShort {
                required: start + TRAILER_SIZE,
                available: self.cursor.len(),
            })?;
        Ok(start..end)
    }
}
