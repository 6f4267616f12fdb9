//! Integration tests for the document lifecycle: copy parse, in-place
//! parse, clearing, and re-parsing
use std::fs;

use jsonfig::errors::ErrorDetails;
use jsonfig::{relative_file, Document};

#[test]
fn should_start_out_empty() {
    let doc = Document::new();
    assert!(doc.root().is_none());
}

#[test]
fn should_hold_the_tree_until_cleared() {
    let mut doc = Document::new();
    doc.parse_str(r#"{"a": 1}"#).unwrap();
    assert!(doc.root().is_some());
    assert_eq!(doc.root().unwrap().as_obj().unwrap().len(), 1);
    doc.clear();
    assert!(doc.root().is_none());
}

#[test]
fn should_release_the_previous_tree_on_reparse() {
    let mut doc = Document::new();
    let first = doc.parse_str(r#"{"a": 1}"#).unwrap();
    assert_eq!(first.as_obj().unwrap().len(), 1);
    let second = doc.parse_str("[1, 2, 3]").unwrap();
    assert_eq!(second.as_arr().unwrap().len(), 3);
}

#[test]
fn should_end_up_empty_after_a_failed_parse() {
    let mut doc = Document::new();
    doc.parse_str(r#"{"a": 1}"#).unwrap();
    assert!(doc.parse_str(r#"{"a": }"#).is_err());
    assert!(doc.root().is_none());
}

#[test]
fn should_parse_bytes_and_str_identically() {
    let mut doc = Document::new();
    let via_bytes = doc.parse(br#"{"n": 1}"#).unwrap().line();
    let via_str = doc.parse_str(r#"{"n": 1}"#).unwrap().line();
    assert_eq!(via_bytes, via_str);
}

#[test]
fn should_decode_in_place_and_zero_terminate() {
    let mut buf = br#"{"c": "x\u00e9y"}"#.to_vec();
    let content_start = br#"{"c": ""#.len();
    {
        let mut doc = Document::new();
        let root = doc.parse_in_place(&mut buf).unwrap();
        let c = root.as_obj().unwrap().get_str("c", None).unwrap();
        assert_eq!(c, "x\u{e9}y");
    }
    // the escape was rewritten in place and terminated with a zero byte
    assert_eq!(
        &buf[content_start..content_start + 5],
        &[0x78, 0xc3, 0xa9, 0x79, 0x00]
    );
}

#[test]
fn should_leave_the_buffer_untouched_when_utf8_validation_fails() {
    let original = b"{\"k\": \"\xff\"}".to_vec();
    let mut buf = original.clone();
    let mut doc = Document::new();
    let err = doc.parse_in_place(&mut buf).unwrap_err();
    assert_eq!(
        err.details,
        ErrorDetails::Syntax("invalid document: not valid utf-8")
    );
    drop(doc);
    assert_eq!(buf, original);
}

#[test]
fn should_not_disturb_unescaped_regions_in_place() {
    let mut buf = br#"[10, 20, "plain"]"#.to_vec();
    {
        let mut doc = Document::new();
        let root = doc.parse_in_place(&mut buf).unwrap();
        let arr = root.as_arr().unwrap();
        assert_eq!(arr.get_i64(0, 0, -1).unwrap(), 10);
        assert_eq!(arr.get_str(2).unwrap(), "plain");
    }
    // only the closing quote of the string was overwritten
    assert_eq!(&buf[..9], br#"[10, 20, "#);
    assert_eq!(&buf[10..15], b"plain");
    assert_eq!(buf[15], 0);
}

#[test]
fn should_parse_the_server_fixture() {
    let source = fs::read(relative_file!("fixtures/valid/server.json")).unwrap();
    let mut doc = Document::new();
    let root = doc.parse(&source).unwrap();
    let cfg = root.as_obj().unwrap();

    assert_eq!(cfg.get_str("host", None).unwrap(), "0.0.0.0");
    assert_eq!(cfg.get_i32("port", 1, 65535, None).unwrap(), 8443);
    assert!(cfg.get_bool("tls", Some(false)).unwrap());
    let backends = cfg.get_arr("backends").unwrap();
    assert_eq!(backends.len(), 2);
    for backend in backends.iter() {
        let backend = backend.as_obj().unwrap();
        assert!(!backend.get_str("addr", None).unwrap().is_empty());
        backend.get_i32("weight", 0, 100, Some(1)).unwrap();
    }
    let log = cfg.get_obj("log").unwrap();
    log.get_enum("level", &["debug", "info", "warn", "error"], &[0, 1, 2, 3])
        .unwrap();
    log.get_str("file", Some("-")).unwrap();

    root.reject_unknown_members().unwrap();
}

#[test]
fn should_parse_the_telemetry_fixture() {
    let source = fs::read(relative_file!("fixtures/valid/telemetry.json")).unwrap();
    let mut doc = Document::new();
    let root = doc.parse(&source).unwrap();
    let cfg = root.as_obj().unwrap();
    assert_eq!(cfg.get_str("schema", None).unwrap(), "telemetry/v1");
    let series = cfg.get_arr("series").unwrap();
    assert!(series.len() >= 3);
    root.ignore_members();
    root.reject_unknown_members().unwrap();
}
