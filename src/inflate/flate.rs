use anyhow::{Context, Result, bail};
use flate2::{Decompress, FlushDecompress, Status};

use super::Inflate;

/// Initial output reservation, grown by doubling.
const CHUNK_SIZE: usize = 32 * 1024;

/// flate2-backed raw inflater with an optional output cap
#[derive(Debug, Clone, Copy, Default)]
pub struct FlateInflater {
    limit: Option<u64>,
}

impl FlateInflater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse payloads that inflate to more than `max_output` bytes.
    pub fn with_limit(max_output: u64) -> Self {
        Self {
            limit: Some(max_output),
        }
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}

impl Inflate for FlateInflater {
    fn inflate_raw(&self, deflated: &[u8]) -> Result<Vec<u8>> {
        // raw stream: no zlib header
        let mut inflater = Decompress::new(false);
        let mut out = Vec::with_capacity(CHUNK_SIZE.min(deflated.len().saturating_mul(4).max(64)));

        loop {
            if out.len() == out.capacity() {
                out.reserve(out.capacity().max(CHUNK_SIZE));
            }

            let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
            let input = &deflated[in_before as usize..];
            let status = inflater
                .decompress_vec(input, &mut out, FlushDecompress::None)
                .context("raw inflate failed")?;

            if let Some(limit) = self.limit {
                if out.len() as u64 > limit {
                    bail!("inflated size exceeds limit of {limit} bytes");
                }
            }

            match status {
                Status::StreamEnd => return Ok(out),
                // output space was available, so no progress means no more input
                _ if inflater.total_in() == in_before && inflater.total_out() == out_before => {
                    bail!("deflate stream truncated after {} bytes", in_before)
                }
                _ => {}
            }
        }
    }
}
