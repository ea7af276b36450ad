//! Tests for delimited reading with encoding fallback.

use census_tables::{read_delimited, EncodingChain, ReadOptions, TextEncoding};
use test_utils::Workspace;
use tract_common::MapError;

// ============================================================================
// Encoding fallback
// ============================================================================

#[test]
fn test_ascii_file_uses_first_encoding() {
    let ws = Workspace::new();
    let path = ws.write_bytes("migeo2020.pl", b"PLST|MI|140|26163010100\n");

    let table = read_delimited(&path, &ReadOptions::pipe_delimited()).unwrap();
    assert_eq!(table.encoding, TextEncoding::Latin1);
    assert_eq!(table.field(0, 3), Some("26163010100"));
}

#[test]
fn test_third_candidate_only_decodes_correctly() {
    let ws = Workspace::new();
    // 0x96 is an en dash in Windows-1252 and a C1 control in both ISO-8859 variants
    let path = ws.write_bytes("geo.pl", b"PLST|MI|050|Wayne \x96 Detroit\n");

    let table = read_delimited(&path, &ReadOptions::pipe_delimited()).unwrap();
    assert_eq!(table.encoding, TextEncoding::Windows1252);
    assert_eq!(table.field(0, 3), Some("Wayne \u{2013} Detroit"));
}

#[test]
fn test_no_candidate_fails_naming_file() {
    let ws = Workspace::new();
    let path = ws.write_bytes("broken.pl", b"PLST|MI|\x8D|140\n");

    match read_delimited(&path, &ReadOptions::pipe_delimited()) {
        Err(MapError::UnsupportedEncoding { path: failed }) => assert_eq!(failed, path),
        other => panic!("Expected UnsupportedEncoding, got {:?}", other),
    }

    let message = read_delimited(&path, &ReadOptions::pipe_delimited())
        .unwrap_err()
        .to_string();
    assert!(message.contains("broken.pl"));
}

#[test]
fn test_custom_chain_order_is_respected() {
    let ws = Workspace::new();
    let path = ws.write_bytes("euro.txt", b"a|\xA4\n");

    let options = ReadOptions {
        delimiter: b'|',
        has_headers: false,
        encodings: EncodingChain::new(vec![TextEncoding::Latin9, TextEncoding::Latin1]),
    };
    let table = read_delimited(&path, &options).unwrap();
    assert_eq!(table.encoding, TextEncoding::Latin9);
    assert_eq!(table.field(0, 1), Some("\u{20AC}"));
}

#[test]
fn test_missing_file_is_io_error() {
    let ws = Workspace::new();
    let result = read_delimited(ws.path("absent.pl"), &ReadOptions::pipe_delimited());
    assert!(matches!(result, Err(MapError::Io(_))));
}

// ============================================================================
// Field handling
// ============================================================================

#[test]
fn test_fields_stay_text() {
    let ws = Workspace::new();
    let path = ws.write_lines("roi.csv", &["FIPS,COMP_RANK", "04001944201,01", "26163010100,1"]);

    let table = read_delimited(&path, &ReadOptions::csv_with_headers()).unwrap();
    assert_eq!(table.headers, vec!["FIPS", "COMP_RANK"]);
    assert_eq!(table.field(0, 0), Some("04001944201"));
    assert_eq!(table.field(0, 1), Some("01"));
}

#[test]
fn test_ragged_rows_are_accepted() {
    let ws = Workspace::new();
    let path = ws.write_lines("ragged.pl", &["a|b|c", "d|e"]);

    let table = read_delimited(&path, &ReadOptions::pipe_delimited()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.field(1, 2), None);
}

#[test]
fn test_empty_file_has_no_rows() {
    let ws = Workspace::new();
    let path = ws.write_bytes("empty.pl", b"");

    let table = read_delimited(&path, &ReadOptions::pipe_delimited()).unwrap();
    assert!(table.is_empty());
}
