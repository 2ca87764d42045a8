//! Raw DEFLATE boundary.
//!
//! The container parser never decodes DEFLATE itself; it hands the payload
//! to an [`Inflate`] implementation. [`FlateInflater`] is the default,
//! backed by flate2. Closures work too, which keeps the container logic
//! testable with synthetic stand-ins.

mod flate;

pub use flate::FlateInflater;

use anyhow::Result;

/// Raw inflate: deflate-compressed bytes in, no gzip or zlib framing.
pub trait Inflate {
    /// Decompress `deflated` completely, or fail if it is not valid DEFLATE.
    fn inflate_raw(&self, deflated: &[u8]) -> Result<Vec<u8>>;
}

impl<F> Inflate for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>>,
{
    fn inflate_raw(&self, deflated: &[u8]) -> Result<Vec<u8>> {
        self(deflated)
    }
}
