use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::error::{GzipError, Result};
use crate::inflate::{FlateInflater, Inflate};

use super::parser::GzipParser;
use super::structures::{GzipHeader, TRAILER_SIZE};

/// A fully validated single-member gzip stream.
///
/// Only [`GzipContainer::parse`] and [`GzipContainer::parse_with`] build one,
/// and they either return a container whose header, payload, CRC-32 and size
/// all checked out, or the first reason it did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipContainer {
    header: GzipHeader,
    payload: Range<usize>,
    crc32: u32,
    isize: u32,
    data: Vec<u8>,
}

impl GzipContainer {
    /// Parse and validate `bytes`, inflating with [`FlateInflater`].
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_with(bytes, &FlateInflater::default())
    }

    /// Parse and validate `bytes`, inflating the payload with `inflater`.
    ///
    /// # Errors
    ///
    /// Checks run in wire order and the first failure is returned. The
    /// inflater is only called once the whole header has been validated.
    pub fn parse_with<I>(bytes: &[u8], inflater: &I) -> Result<Self>
    where
        I: Inflate + ?Sized,
    {
        Self::validate(bytes, inflater).inspect_err(|e| debug!("gzip member rejected: {e}"))
    }

    fn validate<I>(bytes: &[u8], inflater: &I) -> Result<Self>
    where
        I: Inflate + ?Sized,
    {
        let (header, payload) = GzipParser::new(bytes).parse()?;
        debug!(
            "gzip header parsed: flags {:#04x}, payload {}..{}",
            header.flags, payload.start, payload.end
        );

        let data = inflater
            .inflate_raw(&bytes[payload.clone()])
            .map_err(GzipError::Inflate)?;
        debug!("payload inflated: {} -> {} bytes", payload.len(), data.len());

        let trailer = &bytes[bytes.len() - TRAILER_SIZE..];
        let crc32 = LittleEndian::read_u32(&trailer[..4]);
        let isize = LittleEndian::read_u32(&trailer[4..]);

        let computed = crc32fast::hash(&data);
        if computed != crc32 {
            return Err(GzipError::DataChecksumMismatch {
                stored: crc32,
                computed,
            });
        }

        let actual = wire_size(data.len() as u64);
        if actual != isize {
            return Err(GzipError::SizeMismatch {
                stored: isize,
                actual,
            });
        }

        debug!("gzip member valid: crc {crc32:#010x}, {} bytes", data.len());
        Ok(Self {
            header,
            payload,
            crc32,
            isize,
            data,
        })
    }

    pub fn header(&self) -> &GzipHeader {
        &self.header
    }

    /// Where the deflate payload sits in the parsed buffer.
    pub fn payload_range(&self) -> Range<usize> {
        self.payload.clone()
    }

    /// Trailer CRC-32 of the decompressed data.
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    /// Trailer ISIZE: decompressed length mod 2^32.
    pub fn isize(&self) -> u32 {
        self.isize
    }

    /// The decompressed bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn into_parts(self) -> (GzipHeader, Vec<u8>) {
        (self.header, self.data)
    }
}

/// ISIZE is the input length modulo 2^32.
fn wire_size(len: u64) -> u32 {
    (len % (1 << 32)) as u32
}
