use std::borrow::Cow;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// ID1, ID2 and CM (deflate) - the first three bytes of every member
pub const SIGNATURE: &[u8] = b"\x1f\x8b\x08";

/// Fixed member header - 10 bytes
pub const HEADER_SIZE: usize = 10;

/// CRC32 + ISIZE - 8 bytes
pub const TRAILER_SIZE: usize = 8;

/// Fixed header, an empty deflate block and the trailer.
pub const MIN_MEMBER_SIZE: usize = 18;

/// FLG bits (RFC 1952 section 2.3.1)
pub const FTEXT: u8 = 0x01;
pub const FHCRC: u8 = 0x02;
pub const FEXTRA: u8 = 0x04;
pub const FNAME: u8 = 0x08;
pub const FCOMMENT: u8 = 0x10;
pub const FRESERVED: u8 = 0xE0;

/// Operating system that produced the member (OS byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
    Fat,
    Amiga,
    Vms,
    Unix,
    VmCms,
    AtariTos,
    Hpfs,
    Macintosh,
    ZSystem,
    CpM,
    Tops20,
    Ntfs,
    Qdos,
    AcornRiscos,
    Unknown(u8),
}

impl OperatingSystem {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => OperatingSystem::Fat,
            1 => OperatingSystem::Amiga,
            2 => OperatingSystem::Vms,
            3 => OperatingSystem::Unix,
            4 => OperatingSystem::VmCms,
            5 => OperatingSystem::AtariTos,
            6 => OperatingSystem::Hpfs,
            7 => OperatingSystem::Macintosh,
            8 => OperatingSystem::ZSystem,
            9 => OperatingSystem::CpM,
            10 => OperatingSystem::Tops20,
            11 => OperatingSystem::Ntfs,
            12 => OperatingSystem::Qdos,
            13 => OperatingSystem::AcornRiscos,
            _ => OperatingSystem::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            OperatingSystem::Fat => 0,
            OperatingSystem::Amiga => 1,
            OperatingSystem::Vms => 2,
            OperatingSystem::Unix => 3,
            OperatingSystem::VmCms => 4,
            OperatingSystem::AtariTos => 5,
            OperatingSystem::Hpfs => 6,
            OperatingSystem::Macintosh => 7,
            OperatingSystem::ZSystem => 8,
            OperatingSystem::CpM => 9,
            OperatingSystem::Tops20 => 10,
            OperatingSystem::Ntfs => 11,
            OperatingSystem::Qdos => 12,
            OperatingSystem::AcornRiscos => 13,
            OperatingSystem::Unknown(v) => *v,
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingSystem::Fat => f.write_str("FAT"),
            OperatingSystem::Amiga => f.write_str("Amiga"),
            OperatingSystem::Vms => f.write_str("VMS"),
            OperatingSystem::Unix => f.write_str("Unix"),
            OperatingSystem::VmCms => f.write_str("VM/CMS"),
            OperatingSystem::AtariTos => f.write_str("Atari TOS"),
            OperatingSystem::Hpfs => f.write_str("HPFS"),
            OperatingSystem::Macintosh => f.write_str("Macintosh"),
            OperatingSystem::ZSystem => f.write_str("Z-System"),
            OperatingSystem::CpM => f.write_str("CP/M"),
            OperatingSystem::Tops20 => f.write_str("TOPS-20"),
            OperatingSystem::Ntfs => f.write_str("NTFS"),
            OperatingSystem::Qdos => f.write_str("QDOS"),
            OperatingSystem::AcornRiscos => f.write_str("Acorn RISCOS"),
            OperatingSystem::Unknown(v) => write!(f, "unknown ({v})"),
        }
    }
}

/// Compressor hint carried in XFL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionHint {
    Maximum,
    Fastest,
    Unspecified(u8),
}

impl CompressionHint {
    pub fn from_u8(value: u8) -> Self {
        match value {
            2 => CompressionHint::Maximum,
            4 => CompressionHint::Fastest,
            _ => CompressionHint::Unspecified(value),
        }
    }
}

/// FEXTRA payload: one subfield tagged by the (SI1, SI2) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraField {
    pub si1: u8,
    pub si2: u8,
    pub content: Vec<u8>,
}

impl ExtraField {
    pub fn subfield_id(&self) -> (u8, u8) {
        (self.si1, self.si2)
    }
}

/// Parsed member header.
///
/// Optional sections are `None` exactly when their FLG bit is clear. The
/// FHCRC value is checked during parsing and not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    pub flags: u8,
    /// Seconds since the Unix epoch, 0 when not recorded
    pub modification_time: i32,
    pub extra_flags: u8,
    pub os: u8,
    pub extra_field: Option<ExtraField>,
    /// Original file name without its NUL terminator
    pub filename: Option<Vec<u8>>,
    pub comment: Option<Vec<u8>>,
}

impl GzipHeader {
    /// FTEXT: the compressor believed the payload to be text.
    pub fn is_text(&self) -> bool {
        self.flags & FTEXT != 0
    }

    pub fn has_header_crc(&self) -> bool {
        self.flags & FHCRC != 0
    }

    pub fn operating_system(&self) -> OperatingSystem {
        OperatingSystem::from_u8(self.os)
    }

    pub fn compression_hint(&self) -> CompressionHint {
        CompressionHint::from_u8(self.extra_flags)
    }

    /// Modification time as a [`SystemTime`], `None` if the stamp is 0.
    pub fn modified(&self) -> Option<SystemTime> {
        let secs = self.modification_time;
        if secs == 0 {
            return None;
        }
        let offset = Duration::from_secs(u64::from(secs.unsigned_abs()));
        if secs > 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }

    /// File name decoded as ISO-8859-1, which is what RFC 1952 mandates.
    pub fn filename_lossy(&self) -> Option<Cow<'_, str>> {
        self.filename.as_deref().map(latin1)
    }

    pub fn comment_lossy(&self) -> Option<Cow<'_, str>> {
        self.comment.as_deref().map(latin1)
    }
}

fn latin1(bytes: &[u8]) -> Cow<'_, str> {
    if bytes.is_ascii() {
        // ASCII is valid UTF-8
        Cow::Borrowed(std::str::from_utf8(bytes).unwrap_or_default())
    } else {
        Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
    }
}

/// Check the ID1/ID2 magic without parsing anything else.
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[..2] == SIGNATURE[..2]
}
