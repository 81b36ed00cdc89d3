use super::*;
use crate::assets::decode::SourceImage;
use crate::export::encode::{EncodedImage, ExportFormat};

fn loaded_state() -> TransformState {
    let mut state = TransformState::default();
    let img = SourceImage::from_premul_rgba8(8, 6, vec![255; 8 * 6 * 4]).unwrap();
    state.load(img);
    state.rotate(90.0);
    state.zoom_by(1.5);
    state.pan(-3.0, 4.5);
    state
}

fn encoded(bytes: &[u8]) -> EncodedImage {
    EncodedImage {
        format: ExportFormat::Png,
        width: 1,
        height: 1,
        bytes: bytes.to_vec(),
    }
}

#[test]
fn wire_format_is_stable_camel_case_json() {
    let exports = ExportSet {
        thumb: None,
        full: Some(encoded(b"hi")),
    };
    let payload = to_payload(
        &loaded_state(),
        &exports,
        Size::new(400.0, 400.0),
        None,
        1_700_000_000_000,
    );
    let wire = to_wire_format(&payload).unwrap();
    assert_eq!(
        wire,
        concat!(
            r#"{"rotation":90.0,"zoom":1.5,"positionX":-3.0,"positionY":4.5,"#,
            r#""canvasWidth":400.0,"canvasHeight":400.0,"imageWidth":8,"imageHeight":6,"#,
            r#""hasImage":true,"finalImage":"data:image/png;base64,aGk=","#,
            r#""timestamp":1700000000000}"#
        )
    );
    assert_eq!(to_wire_format(&payload).unwrap(), wire);
}

#[test]
fn cleared_state_serializes_to_empty_string() {
    let mut state = loaded_state();
    state.clear();
    let exports = ExportSet {
        thumb: Some(encoded(b"t")),
        full: Some(encoded(b"f")),
    };
    let payload = to_payload(&state, &exports, Size::new(400.0, 400.0), Some("u"), 1);
    assert!(!payload.has_image);
    assert!(payload.final_image.is_none());
    assert!(payload.thumb_image.is_none());
    assert!(payload.final_image_url.is_none());
    assert_eq!(to_wire_format(&payload).unwrap(), "");
    assert_eq!(from_wire_format("").unwrap(), None);
    assert_eq!(from_wire_format("  \n").unwrap(), None);
}

#[test]
fn read_back_tolerates_missing_and_unknown_fields() {
    let wire = r#"{"rotation":-90,"zoom":2,"hasImage":true,"finalImage":"data:x","extra":{"a":1}}"#;
    let payload = from_wire_format(wire).unwrap().unwrap();
    assert_eq!(payload.rotation, -90.0);
    assert_eq!(payload.zoom, 2.0);
    assert!(payload.has_image);
    assert_eq!(payload.final_image.as_deref(), Some("data:x"));
    assert!(payload.final_image_url.is_none());
    assert!(payload.thumb_image.is_none());
    assert_eq!(payload.timestamp, 0);
}

#[test]
fn hosted_url_uses_upper_case_key() {
    let exports = ExportSet::default();
    let payload = to_payload(
        &loaded_state(),
        &exports,
        Size::new(400.0, 400.0),
        Some("https://cdn.example/a.png"),
        5,
    );
    let wire = to_wire_format(&payload).unwrap();
    assert!(wire.contains(r#""finalImageURL":"https://cdn.example/a.png""#));
    assert_eq!(from_wire_format(&wire).unwrap(), Some(payload));
}

#[test]
fn malformed_wire_is_a_serde_error() {
    assert!(matches!(
        from_wire_format("{not json"),
        Err(FrameError::Serde(_))
    ));
}

#[test]
fn output_field_supersedes_and_validates() {
    let mut field = OutputField::default();
    assert_eq!(field.read().unwrap(), None);

    let payload = to_payload(
        &loaded_state(),
        &ExportSet::default(),
        Size::new(400.0, 400.0),
        None,
        1,
    );
    field.write_payload(&payload).unwrap();
    assert_eq!(field.read().unwrap(), Some(payload.clone()));

    let mut next = payload;
    next.timestamp = 2;
    field.write_payload(&next).unwrap();
    assert_eq!(field.read().unwrap().map(|p| p.timestamp), Some(2));

    assert!(field.write_raw("garbage").is_err());
    assert_eq!(field.read().unwrap().map(|p| p.timestamp), Some(2));

    field.write_raw(r#"{"hasImage":true}"#).unwrap();
    assert_eq!(field.value(), r#"{"hasImage":true}"#);

    field.clear();
    assert_eq!(field.value(), "");
}
