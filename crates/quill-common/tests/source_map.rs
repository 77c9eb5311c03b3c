use super::*;
use proptest::prelude::*;

#[test]
fn test_vlq_encode_positive() {
    assert_eq!(vlq::encode(0), "A");
    assert_eq!(vlq::encode(1), "C");
    assert_eq!(vlq::encode(15), "e");
    assert_eq!(vlq::encode(16), "gB");
}

#[test]
fn test_vlq_encode_negative() {
    // Sign in LSB
    assert_eq!(vlq::encode(-1), "D");
    assert_eq!(vlq::encode(-15), "f");
}

#[test]
fn test_vlq_decode_reports_consumed_bytes() {
    let (value, consumed) = vlq::decode("gBAAA").expect("valid vlq");
    assert_eq!(value, 16);
    assert_eq!(consumed, 2);
}

#[test]
fn test_vlq_decode_rejects_bad_input() {
    assert_eq!(vlq::decode(""), None);
    assert_eq!(vlq::decode("!"), None);
    // Continuation bit set on the last digit
    assert_eq!(vlq::decode("g"), None);
}

proptest! {
    #[test]
    fn vlq_round_trips(value in -1_000_000_000i64..1_000_000_000i64) {
        let encoded = vlq::encode(value);
        prop_assert_eq!(vlq::decode(&encoded), Some((value, encoded.len())));
    }
}

#[test]
fn test_source_map_simple() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let source_idx = generator.add_source("input.q".to_string());

    generator.add_simple_mapping(0, 0, source_idx, 0, 0);
    generator.add_simple_mapping(0, 10, source_idx, 0, 5);
    generator.add_simple_mapping(1, 0, source_idx, 1, 0);

    let json = generator.to_json().expect("serialise source map");
    assert!(json.contains("\"version\":3"), "Should be v3 source map: {json}");
    assert!(json.contains("\"file\":\"output.js\""), "Should have file: {json}");
    assert!(json.contains("\"sources\":[\"input.q\"]"), "Should have sources: {json}");
    assert!(json.contains("\"names\":[]"), "Should have empty names: {json}");
    assert!(json.contains("\"mappings\":\"AAAA,UAAK;AACL\""), "mappings: {json}");
    assert!(!json.contains("sourcesContent"));
    assert!(!json.contains("sourceRoot"));
}

#[test]
fn test_source_map_with_content_and_root() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    generator.set_source_root("src/");
    generator.add_source_with_content("input.q".to_string(), "print 1".to_string());
    generator.add_simple_mapping(0, 0, 0, 0, 0);

    let doc = generator.to_document();
    assert_eq!(doc.source_root.as_deref(), Some("src/"));
    assert_eq!(
        doc.sources_content,
        Some(vec![Some("print 1".to_string())])
    );

    let json = generator.to_json().expect("serialise source map");
    assert!(json.contains("\"sourcesContent\":[\"print 1\"]"));
    assert!(json.contains("\"sourceRoot\":\"src/\""));
}

#[test]
fn test_add_source_deduplicates() {
    let mut generator = SourceMapGenerator::new("out.js".to_string());
    assert_eq!(generator.add_source("a.q".to_string()), 0);
    assert_eq!(generator.add_source("b.q".to_string()), 1);
    assert_eq!(generator.add_source("a.q".to_string()), 0);
    assert_eq!(generator.sources(), ["a.q".to_string(), "b.q".to_string()]);
}

#[test]
fn test_encode_skips_unmapped_lines() {
    let mut generator = SourceMapGenerator::new("out.js".to_string());
    generator.add_source("a.q".to_string());
    generator.add_simple_mapping(2, 4, 0, 1, 0);

    assert_eq!(generator.encode_mappings(), ";;IACA");
}

#[test]
fn test_encode_sorts_by_generated_position() {
    let mut generator = SourceMapGenerator::new("out.js".to_string());
    generator.add_source("a.q".to_string());
    generator.add_simple_mapping(1, 0, 0, 5, 0);
    generator.add_simple_mapping(0, 3, 0, 1, 2);
    generator.add_simple_mapping(0, 0, 0, 1, 0);

    let decoded = decode_mappings(&generator.encode_mappings()).expect("decode");
    let positions: Vec<_> = decoded
        .iter()
        .map(|m| (m.generated_line, m.generated_column, m.original_line))
        .collect();
    assert_eq!(positions, vec![(0, 0, 1), (0, 3, 1), (1, 0, 5)]);
}

#[test]
fn test_decode_mappings_round_trip() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let a = generator.add_source("a.q".to_string());
    let b = generator.add_source("b.q".to_string());

    generator.add_simple_mapping(0, 0, a, 0, 0);
    generator.add_simple_mapping(0, 5, b, 3, 3);
    generator.add_simple_mapping(1, 0, a, 1, 0);
    generator.add_simple_mapping(3, 8, b, 0, 12);

    let json = generator.to_json().expect("serialise source map");
    let doc: SourceMapDocument = serde_json::from_str(&json).expect("parse source map");
    let decoded = decode_mappings(&doc.mappings).expect("decode");

    assert_eq!(decoded, generator.mappings().to_vec());
}

#[test]
fn test_decode_skips_generated_only_segments_and_names() {
    // "E" = generated-only segment at column 2; "EAAAA" carries a name index.
    let decoded = decode_mappings("E,EAAAA").expect("decode");
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].generated_column, 4);
}

#[test]
fn test_decode_rejects_malformed_segments() {
    assert!(matches!(
        decode_mappings("AA"),
        Err(DecodeError::InvalidSegmentLength { fields: 2, .. })
    ));
    assert!(matches!(
        decode_mappings("A!"),
        Err(DecodeError::InvalidVlq { line: 0, .. })
    ));
    assert!(matches!(
        decode_mappings("ADAA"),
        Err(DecodeError::NegativePosition { .. })
    ));
}

#[test]
fn test_inline_source_map() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    generator.add_source("input.q".to_string());
    generator.add_simple_mapping(0, 0, 0, 0, 0);

    let inline = generator.to_inline_comment().expect("serialise source map");
    assert!(inline.starts_with("//# sourceMappingURL=data:application/json;base64,"));
}

#[test]
fn test_base64_encode() {
    assert_eq!(base64_encode(b""), "");
    assert_eq!(base64_encode(b"f"), "Zg==");
    assert_eq!(base64_encode(b"fo"), "Zm8=");
    assert_eq!(base64_encode(b"foo"), "Zm9v");
    assert_eq!(base64_encode(b"foobar"), "Zm9vYmFy");
}
