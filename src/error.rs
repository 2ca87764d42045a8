use thiserror::Error;

/// Reasons a gzip container is rejected.
///
/// Every variant is terminal: the first failed check aborts the parse and
/// no partially parsed container is ever handed back.
#[derive(Debug, Error)]
pub enum GzipError {
    /// The buffer is shorter than the bytes required at the point of the check.
    #[error("gzip stream truncated: need {required} bytes, have {available}")]
    TooShort { required: usize, available: usize },

    /// ID1, ID2 or CM do not spell `1F 8B 08`.
    #[error("not a gzip stream (bad magic or compression method)")]
    BadMagic,

    /// One of the reserved FLG bits 5-7 is set.
    #[error("reserved header flag bits set: {0:#04x}")]
    ReservedFlagSet(u8),

    /// FEXTRA subfield id SI2 is zero.
    #[error("reserved extra subfield id ({si1:#04x}, 0x00)")]
    ReservedSubfieldId { si1: u8 },

    /// FNAME or FCOMMENT runs off the end of the buffer without a NUL.
    #[error("unterminated {0} field")]
    UnterminatedField(&'static str),

    #[error("header crc mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    HeaderChecksumMismatch { stored: u16, computed: u16 },

    /// The inflate collaborator rejected the payload.
    #[error("invalid deflate payload: {0}")]
    Inflate(#[source] anyhow::Error),

    #[error("data crc mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    DataChecksumMismatch { stored: u32, computed: u32 },

    #[error("size mismatch: stored {stored}, actual {actual} (mod 2^32)")]
    SizeMismatch { stored: u32, actual: u32 },
}

pub type Result<T, E = GzipError> = std::result::Result<T, E>;
