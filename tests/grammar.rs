use std::collections::BTreeMap;

use envfile::{Entry, parse_str};

#[test]
fn parses_basic_fixture() {
    let fixture = include_str!("fixtures/basic.env");
    let entries = parse_str(fixture).expect("fixture should parse");

    let map = to_map(entries);
    assert_eq!(map.get("BASIC").expect("BASIC"), "basic");
    assert_eq!(map.get("EMPTY").expect("EMPTY"), "");
    assert_eq!(map.get("SINGLE").expect("SINGLE"), "single quoted");
    assert_eq!(map.get("DOUBLE").expect("DOUBLE"), "double quoted");
    assert_eq!(map.get("INLINE_COMMENT").expect("INLINE_COMMENT"), "value");
    assert_eq!(map.get("HASH_VALUE").expect("HASH_VALUE"), "a#b");
    assert_eq!(map.get("SPACED_KEY").expect("SPACED_KEY"), "padded");
}

#[test]
fn parses_assignment_prefixes() {
    let fixture = include_str!("fixtures/prefixes.env");
    let entries = parse_str(fixture).expect("fixture should parse");

    let map = to_map(entries);
    assert_eq!(map.get("EXPORTED").expect("EXPORTED"), "1");
    assert_eq!(map.get("SHELL_SET").expect("SHELL_SET"), "2");
    assert_eq!(map.get("BATCH_SET").expect("BATCH_SET"), "3");
    assert_eq!(map.get("TRACED").expect("TRACED"), "4");
    assert_eq!(map.get("PLAIN").expect("PLAIN"), "5");
}

#[test]
fn parses_multiline_fixture() {
    let fixture = include_str!("fixtures/multiline.env");
    let entries = parse_str(fixture).expect("fixture should parse");

    let map = to_map(entries);
    assert_eq!(
        map.get("MULTI_DOUBLE").expect("MULTI_DOUBLE"),
        "THIS\nIS\nA\nMULTILINE\nSTRING"
    );
    assert_eq!(
        map.get("MULTI_SINGLE").expect("MULTI_SINGLE"),
        "THIS\nIS\nA\nMULTILINE\nSTRING"
    );
    assert_eq!(
        map.get("PEM").expect("PEM"),
        "-----BEGIN PUBLIC KEY-----\nLINE1\nLINE2\n-----END PUBLIC KEY-----"
    );
    assert_eq!(map.get("AFTER").expect("AFTER"), "after_line");
}

#[test]
fn parses_escape_fixture() {
    let fixture = include_str!("fixtures/escapes.env");
    let entries = parse_str(fixture).expect("fixture should parse");

    let map = to_map(entries);
    assert_eq!(map.get("NEWLINE").expect("NEWLINE"), "line1\nline2");
    assert_eq!(map.get("TAB").expect("TAB"), "a\tb");
    assert_eq!(map.get("HEX").expect("HEX"), "AB");
    assert_eq!(map.get("OCTAL").expect("OCTAL"), "AB");
    assert_eq!(map.get("UTF8_BYTES").expect("UTF8_BYTES"), "caf\u{E9}");
    assert_eq!(map.get("BMP").expect("BMP"), "\u{AE}");
    assert_eq!(
        map.get("SURROGATES").expect("SURROGATES"),
        "caf\u{E9} \u{1F680}"
    );
    assert_eq!(map.get("ASTRAL").expect("ASTRAL"), "\u{1F680}");
    assert_eq!(map.get("DOLLAR").expect("DOLLAR"), "$HOME");
    assert_eq!(map.get("UNKNOWN").expect("UNKNOWN"), "q");
}

#[test]
fn parses_interpolation_fixture() {
    let fixture = include_str!("fixtures/interpolation.env");
    let entries = parse_str(fixture).expect("fixture should parse");

    let raw: BTreeMap<String, String> = entries
        .iter()
        .map(|entry| (entry.key.clone(), entry.raw.clone()))
        .collect();
    assert_eq!(raw.get("BIN").expect("BIN"), "${BASE}/bin");
    assert_eq!(raw.get("COPY").expect("COPY"), "$BIN");

    let map = to_map(entries);
    assert_eq!(map.get("BASE").expect("BASE"), "/opt/app");
    assert_eq!(map.get("BIN").expect("BIN"), "/opt/app/bin");
    assert_eq!(map.get("COPY").expect("COPY"), "/opt/app/bin");
    assert_eq!(map.get("UNSET_REF").expect("UNSET_REF"), "");
    assert_eq!(map.get("SINGLE_NO_INTERP").expect("SINGLE_NO_INTERP"), "$BASE");
    assert_eq!(map.get("PRICE").expect("PRICE"), "$5.00");
    assert_eq!(map.get("QUOTED").expect("QUOTED"), "prefix /opt/app suffix");
}

#[test]
fn entries_record_line_numbers() {
    let fixture = include_str!("fixtures/basic.env");
    let entries = parse_str(fixture).expect("fixture should parse");

    let basic = entries
        .iter()
        .find(|entry| entry.key == "BASIC")
        .expect("BASIC entry");
    assert_eq!(basic.line, 2);
    assert!(basic.source.is_none());
}

fn to_map(entries: Vec<Entry>) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .map(|entry| (entry.key, entry.value))
        .collect()
}
