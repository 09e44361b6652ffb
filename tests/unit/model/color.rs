use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    let c: Rgba8 = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 0, 0));

    let c: Rgba8 = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));

    let c: Rgba8 = serde_json::from_value(json!("#fc0")).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 204, 0));
}

#[test]
fn parses_unit_object_and_array() {
    let c: Rgba8 = serde_json::from_value(json!({"r": 1.0, "g": 0.5, "b": 0.0})).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 128, 0));

    let c: Rgba8 = serde_json::from_value(json!([0.0, 0.0, 0.0, 0.5])).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 0, 128));

    assert!(serde_json::from_value::<Rgba8>(json!([0.0, 1.0])).is_err());
}

#[test]
fn serializes_as_hex_and_reparses() {
    let c = Rgba8::rgba(0x12, 0xab, 0x00, 0xff);
    let v = serde_json::to_value(c).unwrap();
    assert_eq!(v, json!("#12ab00ff"));
    let back: Rgba8 = serde_json::from_value(v).unwrap();
    assert_eq!(back, c);
}

#[test]
fn rejects_garbage() {
    assert!(parse_hex("#12345").is_err());
    assert!(parse_hex("#gg0000").is_err());
    assert!(parse_hex("#ééé").is_err());
}
