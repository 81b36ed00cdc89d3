use super::*;

fn photo(w: u32, h: u32) -> SourceImage {
    SourceImage::from_premul_rgba8(w, h, vec![255; (w * h * 4) as usize]).unwrap()
}

#[test]
fn rotation_accumulates_without_normalizing() {
    let mut s = TransformState::default();
    for _ in 0..3 {
        s.rotate(90.0);
    }
    assert_eq!(s.rotation_degrees(), 270.0);
    s.rotate(180.0);
    assert_eq!(s.rotation_degrees(), 450.0);
    s.rotate(-900.0);
    assert_eq!(s.rotation_degrees(), -450.0);
}

#[test]
fn zoom_in_saturates_at_max() {
    let mut s = TransformState::default();
    for _ in 0..50 {
        s.zoom_step(ZoomDirection::In);
        assert!(s.scale() >= ZoomLimits::DEFAULT_MIN && s.scale() <= ZoomLimits::DEFAULT_MAX);
    }
    assert_eq!(s.scale(), 5.0);
}

#[test]
fn zoom_out_saturates_at_min() {
    let mut s = TransformState::default();
    for _ in 0..50 {
        s.zoom_step(ZoomDirection::Out);
    }
    assert_eq!(s.scale(), 0.1);
}

#[test]
fn zoom_by_ignores_degenerate_factors() {
    let mut s = TransformState::default();
    s.zoom_by(0.0);
    s.zoom_by(-2.0);
    s.zoom_by(f64::NAN);
    s.zoom_by(f64::INFINITY);
    assert_eq!(s.scale(), 1.0);
}

#[test]
fn reset_keeps_the_image() {
    let mut s = TransformState::default();
    s.load(photo(8, 6));
    s.rotate(-90.0);
    s.zoom_by(2.0);
    s.pan(12.5, -3.0);
    s.reset();
    assert_eq!(s.rotation_degrees(), 0.0);
    assert_eq!(s.scale(), 1.0);
    assert_eq!(s.offset(), Vec2::ZERO);
    assert!(s.loaded());
    assert_eq!(s.source().map(SourceImage::natural_width), Some(8));
}

#[test]
fn clear_unloads_and_resets() {
    let mut s = TransformState::default();
    s.load(photo(2, 2));
    s.rotate(45.0);
    s.pan(1.0, 1.0);
    s.set_interacting(true);
    s.clear();
    assert!(!s.loaded());
    assert!(s.source().is_none());
    assert_eq!(s.rotation_degrees(), 0.0);
    assert_eq!(s.offset(), Vec2::ZERO);
    assert!(!s.is_interacting());
}

#[test]
fn fit_to_shrinks_large_photos_only() {
    let reference = Size::new(400.0, 400.0);

    let mut s = TransformState::default();
    s.load(photo(800, 600));
    s.fit_to(reference, 0.8);
    assert!((s.scale() - 0.4).abs() < 1e-12);

    s.load(photo(100, 50));
    s.fit_to(reference, 0.8);
    assert_eq!(s.scale(), 1.0);
}

#[test]
fn fit_to_respects_zoom_floor() {
    let mut s = TransformState::default();
    s.load(photo(10_000, 10));
    s.fit_to(Size::new(400.0, 400.0), 0.8);
    assert_eq!(s.scale(), ZoomLimits::DEFAULT_MIN);
}
