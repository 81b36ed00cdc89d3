use super::*;

#[test]
fn empty_object_takes_defaults() {
    let cfg = EditorConfig::from_json("{}").unwrap();
    assert_eq!(cfg, EditorConfig::default());
    assert_eq!(cfg.reference_box(), Size::new(400.0, 400.0));
    assert_eq!(cfg.export_format(), ExportFormat::Png);
    assert_eq!(cfg.settle_delay(), Duration::from_millis(120));
    assert!(cfg.upload_target().is_none());
    assert_eq!(cfg.limits.zoom(), ZoomLimits::default());
}

#[test]
fn host_json_overrides_fields() {
    let cfg = EditorConfig::from_json(
        r#"{
            "overlayFrameUrl": "https://shop.example/frame.png",
            "exportFullEdge": 1600,
            "exportThumbEdge": 200,
            "exportFormat": "jpeg",
            "exportQuality": 0.8,
            "localizedStrings": {"invalidFile": "Scegli un'immagine."},
            "uploadEndpoint": "https://shop.example/upload",
            "uploadToken": "nonce-1",
            "limits": {"zoomMax": 3.0},
            "unknownKey": true
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.export_full_edge, 1600);
    assert_eq!(cfg.export_format(), ExportFormat::Jpeg { quality: 80 });
    assert_eq!(cfg.localized_strings.invalid_file, "Scegli un'immagine.");
    assert_eq!(cfg.localized_strings.image_loaded, "Image loaded successfully!");
    assert_eq!(cfg.limits.zoom_max, 3.0);
    assert_eq!(cfg.limits.zoom_min, 0.1);
    assert_eq!(
        cfg.upload_target(),
        Some(UploadTarget {
            endpoint: "https://shop.example/upload".to_string(),
            token: "nonce-1".to_string(),
        })
    );
}

#[test]
fn validation_rejects_bad_values() {
    let bad = [
        r#"{"canvasWidth": 0}"#,
        r#"{"exportFullEdge": 0}"#,
        r#"{"exportThumbEdge": 70000}"#,
        r#"{"exportQuality": 1.5}"#,
        r#"{"limits": {"zoomMin": 6.0}}"#,
        r#"{"limits": {"zoomStep": 0.0}}"#,
        r#"{"limits": {"fitPadding": 0.0}}"#,
        r#"{"uploadEndpoint": "https://x"}"#,
    ];
    for json in bad {
        assert!(
            matches!(EditorConfig::from_json(json), Err(FrameError::Validation(_))),
            "{json} should fail validation"
        );
    }
    assert!(matches!(
        EditorConfig::from_json("[1,2"),
        Err(FrameError::Serde(_))
    ));
}
