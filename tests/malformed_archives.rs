//! Tests for malformed, corrupted and unusual input archives.
//!
//! Every failure must surface as a typed error naming the failing input;
//! no merged archive is produced.

mod common;

use common::{Fixture, build_zip, build_zip64, central_directory_offset};
use packmerge::{Error, InputSlot, MergeOptions, Stage, decode, merge_archives};

fn valid() -> Vec<u8> {
    build_zip(&[Fixture::stored("pack.mcmeta", b"{\"pack\":{}}")], b"")
}

#[test]
fn decodes_stored_and_deflated_entries() {
    let data = build_zip(
        &[
            Fixture::dir("assets/"),
            Fixture::stored("pack.mcmeta", b"{}"),
            Fixture::deflated("assets/lang.json", &b"lang ".repeat(200)),
        ],
        b"",
    );

    let entries = decode(&data).unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries[0].is_directory());
    assert_eq!(entries[1].payload(), Some(&b"{}"[..]));
    assert_eq!(entries[2].payload().unwrap(), &b"lang ".repeat(200)[..]);
}

#[test]
fn archive_comment_is_tolerated() {
    let data = build_zip(&[Fixture::stored("a.txt", b"a")], b"merged with love");
    assert_eq!(decode(&data).unwrap().len(), 1);
}

#[test]
fn dos_directory_attribute_marks_directories() {
    let mut fixture = Fixture::dir("textures");
    fixture.external_attrs = 0x10;
    let data = build_zip(&[fixture], b"");

    let entries = decode(&data).unwrap();
    assert!(entries[0].is_directory());
    assert_eq!(entries[0].path.as_str(), "textures");
}

#[test]
fn backslash_names_are_normalized() {
    let data = build_zip(&[Fixture::stored("assets\\minecraft\\a.png", b"a")], b"");
    let entries = decode(&data).unwrap();
    assert_eq!(entries[0].path.as_str(), "assets/minecraft/a.png");
}

#[test]
fn duplicate_names_keep_last_record_at_first_position() {
    let data = build_zip(
        &[
            Fixture::stored("a.txt", b"old"),
            Fixture::stored("b.txt", b"b"),
            Fixture::stored("a.txt", b"new"),
        ],
        b"",
    );

    let entries = decode(&data).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].path.as_str(), "a.txt");
    assert_eq!(entries[0].payload(), Some(&b"new"[..]));
}

#[test]
fn empty_input_is_invalid() {
    let err = decode(b"").unwrap_err();
    assert!(matches!(err, Error::InvalidArchive { .. }));
}

#[test]
fn truncated_archive_is_invalid() {
    let data = valid();
    let err = decode(&data[..data.len() - 5]).unwrap_err();
    assert!(matches!(err, Error::InvalidArchive { .. }));
}

#[test]
fn corrupted_central_directory_is_invalid() {
    let mut data = valid();
    let cd = central_directory_offset(&data);
    data[cd] = b'X';

    let err = decode(&data).unwrap_err();
    assert!(matches!(err, Error::InvalidArchive { .. }));
}

#[test]
fn corrupted_local_header_is_invalid() {
    let mut data = valid();
    data[0] = b'X';

    let err = decode(&data).unwrap_err();
    assert!(matches!(err, Error::InvalidArchive { .. }));
}

#[test]
fn traversal_names_are_invalid() {
    let data = build_zip(&[Fixture::stored("../../evil.txt", b"x")], b"");
    let err = decode(&data).unwrap_err();
    assert!(matches!(err, Error::InvalidArchive { .. }));
}

#[test]
fn unsupported_method_is_a_decompression_error() {
    let mut fixture = Fixture::stored("sounds.ogg", b"ogg");
    fixture.method = 14; // LZMA
    let data = build_zip(&[fixture], b"");

    let err = decode(&data).unwrap_err();
    assert!(matches!(err, Error::Decompression { ref path, .. } if path == "sounds.ogg"));
}

#[test]
fn encrypted_entry_is_a_decompression_error() {
    let mut fixture = Fixture::stored("secret.txt", b"s");
    fixture.flags = 0x0001;
    let data = build_zip(&[fixture], b"");

    assert!(matches!(decode(&data).unwrap_err(), Error::Decompression { .. }));
}

#[test]
fn crc_mismatch_is_a_decompression_error() {
    let mut fixture = Fixture::stored("pack.png", b"png bytes");
    fixture.crc_override = Some(0xDEADBEEF);
    let data = build_zip(&[fixture], b"");

    let err = decode(&data).unwrap_err();
    assert!(err.to_string().contains("CRC mismatch"));
}

#[test]
fn corrupt_deflate_stream_is_a_decompression_error() {
    let mut data = build_zip(&[Fixture::deflated("a.json", &b"abc".repeat(100))], b"");
    // First byte of the deflate stream: block type 0b11 is reserved.
    let data_start = 30 + "a.json".len();
    data[data_start] = 0xFF;

    assert!(matches!(decode(&data).unwrap_err(), Error::Decompression { .. }));
}

#[test]
fn deflate_stream_longer_than_declared_is_rejected() {
    let mut fixture = Fixture::deflated("bomb.bin", &vec![0u8; 1 << 20]);
    fixture.size_override = Some(1);
    let data = build_zip(&[fixture], b"");

    let err = decode(&data).unwrap_err();
    assert!(matches!(err, Error::Decompression { ref path, .. } if path == "bomb.bin"));
    assert!(err.to_string().contains("declared size of 1 bytes"));
}

#[test]
fn deflate_stream_shorter_than_declared_is_rejected() {
    let mut fixture = Fixture::deflated("short.bin", b"only a few bytes");
    fixture.size_override = Some(4096);
    let data = build_zip(&[fixture], b"");

    assert!(matches!(decode(&data).unwrap_err(), Error::Decompression { .. }));
}

#[test]
fn zip64_archive_is_read() {
    let mut textures = Fixture::dir("textures");
    textures.external_attrs = 0x10;
    let data = build_zip64(&[
        Fixture::stored("pack.mcmeta", b"{}"),
        textures,
        Fixture::deflated("assets/lang.json", &b"lang ".repeat(200)),
    ]);

    let entries = decode(&data).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].payload(), Some(&b"{}"[..]));
    assert!(entries[1].is_directory());
    assert_eq!(entries[1].path.as_str(), "textures");
    assert_eq!(entries[2].payload().unwrap(), &b"lang ".repeat(200)[..]);

    // ZIP64 in, classic out.
    let merged = merge_archives(&data, &valid(), &MergeOptions::default()).unwrap();
    assert_eq!(decode(&merged).unwrap().len(), 3);
}

#[test]
fn zip64_without_locator_is_invalid() {
    let data = build_zip64(&[Fixture::stored("a.txt", b"a")]);
    let eocd = data.len() - 22;
    let mut cut = data[..eocd - 20].to_vec();
    cut.extend_from_slice(&data[eocd..]);

    let err = decode(&cut).unwrap_err();
    assert!(matches!(err, Error::InvalidArchive { .. }));
}

#[test]
fn zip64_locator_past_end_is_invalid() {
    let mut data = build_zip64(&[Fixture::stored("a.txt", b"a")]);
    let locator = data.len() - 22 - 20;
    data[locator + 8..locator + 16].copy_from_slice(&u64::MAX.to_le_bytes());

    let err = decode(&data).unwrap_err();
    assert!(matches!(err, Error::InvalidArchive { .. }));
}

#[test]
fn zip64_marker_without_any_locator_is_invalid() {
    let mut data = vec![0u8; 22];
    data[..4].copy_from_slice(b"PK\x05\x06");
    data[10..12].copy_from_slice(&u16::MAX.to_le_bytes());

    let err = decode(&data).unwrap_err();
    assert!(err.to_string().contains("ZIP64"));
}

#[test]
fn merge_names_failing_input_and_stage() {
    let bad = b"PK\x03\x04 but nothing else of a real archive".to_vec();

    let err = merge_archives(&bad, &valid(), &MergeOptions::default()).unwrap_err();
    assert_eq!(err.input(), Some(InputSlot::First));
    assert_eq!(err.stage(), Stage::Decode);
    assert!(err.to_string().starts_with("first archive: "));

    let err = merge_archives(&valid(), &bad, &MergeOptions::default()).unwrap_err();
    assert_eq!(err.input(), Some(InputSlot::Second));
}

#[test]
fn merge_can_skip_crc_verification() {
    let mut fixture = Fixture::stored("pack.png", b"png bytes");
    fixture.crc_override = Some(0);
    let broken = build_zip(&[fixture], b"");

    assert!(merge_archives(&valid(), &broken, &MergeOptions::default()).is_err());

    let options = MergeOptions {
        verify_crc: false,
        ..MergeOptions::default()
    };
    let merged = merge_archives(&valid(), &broken, &options).unwrap();
    assert_eq!(decode(&merged).unwrap().len(), 2);
}
