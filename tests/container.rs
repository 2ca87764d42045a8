use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;
use proptest::prelude::*;

use gzcheck::gzip::{FCOMMENT, FEXTRA, FHCRC, FNAME, FTEXT};
use gzcheck::{ExtraField, FlateInflater, GzipContainer, GzipError, OperatingSystem};

/// Test-side member writer: header fields to put on the wire.
#[derive(Debug, Clone, Default)]
struct Member {
    text: bool,
    mtime: i32,
    xfl: u8,
    os: u8,
    extra: Option<ExtraField>,
    name: Option<Vec<u8>>,
    comment: Option<Vec<u8>>,
    header_crc: bool,
}

impl Member {
    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.text {
            flags |= FTEXT;
        }
        if self.header_crc {
            flags |= FHCRC;
        }
        if self.extra.is_some() {
            flags |= FEXTRA;
        }
        if self.name.is_some() {
            flags |= FNAME;
        }
        if self.comment.is_some() {
            flags |= FCOMMENT;
        }
        flags
    }

    fn header(&self) -> Vec<u8> {
        let mut out = vec![0x1f, 0x8b, 0x08, self.flags()];
        out.extend_from_slice(&self.mtime.to_le_bytes());
        out.push(self.xfl);
        out.push(self.os);
        if let Some(extra) = &self.extra {
            out.push(extra.si1);
            out.push(extra.si2);
            out.extend_from_slice(&(extra.content.len() as u16).to_le_bytes());
            out.extend_from_slice(&extra.content);
        }
        for field in [&self.name, &self.comment].into_iter().flatten() {
            out.extend_from_slice(field);
            out.push(0);
        }
        if self.header_crc {
            let crc = (crc32fast::hash(&out) & 0xFFFF) as u16;
            out.extend_from_slice(&crc.to_le_bytes());
        }
        out
    }

    fn encode(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = self.header();
        out.extend_from_slice(&deflate(payload));
        out.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out
    }
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn field_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=255, 0..24)
}

fn extra_field() -> impl Strategy<Value = ExtraField> {
    (any::<u8>(), 1u8..=255, prop::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(si1, si2, content)| ExtraField { si1, si2, content })
}

fn member() -> impl Strategy<Value = Member> {
    (
        any::<bool>(),
        any::<i32>(),
        any::<u8>(),
        any::<u8>(),
        prop::option::of(extra_field()),
        prop::option::of(field_bytes()),
        prop::option::of(field_bytes()),
        any::<bool>(),
    )
        .prop_map(
            |(text, mtime, xfl, os, extra, name, comment, header_crc)| Member {
                text,
                mtime,
                xfl,
                os,
                extra,
                name,
                comment,
                header_crc,
            },
        )
}

#[test]
fn minimal_member() {
    let data = [
        0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x03, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let container = GzipContainer::parse(&data).unwrap();
    let header = container.header();
    assert_eq!(header.flags, 0);
    assert_eq!(header.operating_system(), OperatingSystem::Unix);
    assert!(header.extra_field.is_none());
    assert!(header.filename.is_none());
    assert!(header.comment.is_none());
    assert!(container.data().is_empty());
}

#[test]
fn reserved_flags_rejected_first() {
    let mut data = [
        0x1f, 0x8b, 0x08, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x03, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    // garbage after FLG does not matter
    data[10] = 0xFF;
    assert!(matches!(
        GzipContainer::parse(&data),
        Err(GzipError::ReservedFlagSet(0xE0))
    ));
}

#[test]
fn fully_loaded_header() {
    let member = Member {
        text: true,
        mtime: 1_700_000_000,
        xfl: 2,
        os: 11,
        extra: Some(ExtraField {
            si1: b'R',
            si2: b'A',
            content: vec![9; 6],
        }),
        name: Some(b"notes.txt".to_vec()),
        comment: Some(b"weekly export".to_vec()),
        header_crc: true,
    };
    let payload = b"line one\nline two\n".repeat(50);
    let data = member.encode(&payload);

    let container = GzipContainer::parse(&data).unwrap();
    let header = container.header();
    assert!(header.is_text());
    assert!(header.has_header_crc());
    assert_eq!(header.modification_time, 1_700_000_000);
    assert_eq!(header.operating_system(), OperatingSystem::Ntfs);
    assert_eq!(header.extra_field, member.extra);
    assert_eq!(header.filename_lossy().as_deref(), Some("notes.txt"));
    assert_eq!(header.comment_lossy().as_deref(), Some("weekly export"));
    assert_eq!(container.payload_range().start, member.header().len());
    assert_eq!(container.payload_range().end, data.len() - 8);
    assert_eq!(container.into_data(), payload);
}

#[test]
fn matches_flate2_gz_encoder() {
    let payload = b"written by flate2's own gzip writer".repeat(8);
    let mut encoder = flate2::GzBuilder::new()
        .filename("source.txt")
        .comment("made in a test")
        .mtime(1_234_567)
        .write(Vec::new(), Compression::best());
    encoder.write_all(&payload).unwrap();
    let data = encoder.finish().unwrap();

    let container = GzipContainer::parse(&data).unwrap();
    assert_eq!(container.header().filename.as_deref(), Some(&b"source.txt"[..]));
    assert_eq!(container.header().comment.as_deref(), Some(&b"made in a test"[..]));
    assert_eq!(container.header().modification_time, 1_234_567);
    assert_eq!(container.data(), &payload[..]);
}

#[test]
fn size_mismatch_with_valid_crc() {
    let payload = b"abc";
    let mut data = Member::default().encode(payload);
    let n = data.len();
    data[n - 4..].copy_from_slice(&4u32.to_le_bytes());
    assert!(matches!(
        GzipContainer::parse(&data),
        Err(GzipError::SizeMismatch { stored: 4, actual: 3 })
    ));
}

#[test]
fn corrupt_payload_is_inflate_error() {
    let mut data = Member::default().encode(b"");
    // 0xFF: final block with reserved BTYPE
    data[10] = 0xFF;
    assert!(matches!(GzipContainer::parse(&data), Err(GzipError::Inflate(_))));
}

#[test]
fn inflate_limit_surfaces_as_inflate_error() {
    let data = Member::default().encode(&[0u8; 4096]);
    assert!(matches!(
        GzipContainer::parse_with(&data, &FlateInflater::with_limit(1024)),
        Err(GzipError::Inflate(_))
    ));
    assert!(GzipContainer::parse_with(&data, &FlateInflater::with_limit(4096)).is_ok());
}

#[test]
fn containers_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GzipContainer>();
    assert_send_sync::<GzipError>();
}

proptest! {
    #[test]
    fn short_buffers_are_too_short(data in prop::collection::vec(any::<u8>(), 0..18)) {
        let result = GzipContainer::parse(&data);
        let is_too_short = matches!(result, Err(GzipError::TooShort { required: 18, .. }));
        prop_assert!(is_too_short);
    }

    #[test]
    fn any_reserved_bit_is_rejected(member in member(), bit in 5u8..8) {
        let mut data = member.encode(b"payload");
        data[3] |= 1 << bit;
        let result = GzipContainer::parse(&data);
        let is_reserved = matches!(result, Err(GzipError::ReservedFlagSet(_)));
        prop_assert!(is_reserved);
    }

    #[test]
    fn round_trip(payload in prop::collection::vec(any::<u8>(), 0..2048)) {
        let data = Member::default().encode(&payload);
        let container = GzipContainer::parse(&data).unwrap();
        prop_assert_eq!(container.data(), &payload[..]);
        prop_assert_eq!(container.isize(), payload.len() as u32);
    }

    #[test]
    fn parsing_is_idempotent(member in member(), payload in prop::collection::vec(any::<u8>(), 0..256)) {
        let data = member.encode(&payload);
        let first = GzipContainer::parse(&data).unwrap();
        let second = GzipContainer::parse(&data).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn optional_fields_follow_flags(member in member(), payload in prop::collection::vec(any::<u8>(), 0..64)) {
        let data = member.encode(&payload);
        let container = GzipContainer::parse(&data).unwrap();
        let header = container.header();
        prop_assert_eq!(header.flags, member.flags());
        prop_assert_eq!(header.modification_time, member.mtime);
        prop_assert_eq!(header.extra_flags, member.xfl);
        prop_assert_eq!(header.os, member.os);
        prop_assert_eq!(&header.extra_field, &member.extra);
        prop_assert_eq!(&header.filename, &member.name);
        prop_assert_eq!(&header.comment, &member.comment);
        prop_assert_eq!(container.payload_range().start, member.header().len());
    }

    #[test]
    fn truncated_header_is_too_short(member in member(), cut in any::<prop::sample::Index>()) {
        let data = member.encode(b"some payload");
        // every cut that leaves less than header + trailer
        let header_len = member.header().len();
        let keep = cut.index(header_len + 8);
        let result = GzipContainer::parse(&data[..keep]);
        let truncated = matches!(
            result,
            Err(GzipError::TooShort { .. }) | Err(GzipError::UnterminatedField(_))
        );
        prop_assert!(truncated, "cut at {} gave {:?}", keep, result);
    }

    #[test]
    fn truncation_anywhere_fails_cleanly(member in member(), cut in any::<prop::sample::Index>()) {
        let data = member.encode(b"the quick brown fox jumps over the lazy dog");
        let keep = cut.index(data.len());
        prop_assert!(GzipContainer::parse(&data[..keep]).is_err());
    }

    #[test]
    fn corrupted_header_crc_is_caught(member in member(), flip in 1u16..) {
        let member = Member { header_crc: true, ..member };
        let mut data = member.encode(b"x");
        let at = member.header().len() - 2;
        let stored = u16::from_le_bytes([data[at], data[at + 1]]) ^ flip;
        data[at..at + 2].copy_from_slice(&stored.to_le_bytes());
        let result = GzipContainer::parse(&data);
        let mismatch = matches!(result, Err(GzipError::HeaderChecksumMismatch { .. }));
        prop_assert!(mismatch);
    }
}
