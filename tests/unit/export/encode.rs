use super::*;
use crate::foundation::core::SurfaceSize;

fn white_surface(w: u32, h: u32) -> Surface {
    let mut s = Surface::new(SurfaceSize::new(w, h).unwrap()).unwrap();
    s.data_mut().fill(255);
    s
}

#[test]
fn png_encoding_decodes_back_to_the_same_pixels() {
    let s = white_surface(7, 5);
    let enc = encode_surface(&s, ExportFormat::Png).unwrap();
    assert_eq!((enc.width, enc.height), (7, 5));
    assert_eq!(enc.mime(), "image/png");

    let back = image::load_from_memory(&enc.bytes).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (7, 5));
    assert!(back.pixels().all(|p| p.0 == [255, 255, 255, 255]));
}

#[test]
fn jpeg_encoding_is_deterministic() {
    let s = white_surface(16, 16);
    let a = encode_surface(&s, ExportFormat::jpeg(0.92)).unwrap();
    let b = encode_surface(&s, ExportFormat::jpeg(0.92)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.mime(), "image/jpeg");
    assert_eq!(a.format, ExportFormat::Jpeg { quality: 92 });
}

#[test]
fn jpeg_quality_is_clamped() {
    assert_eq!(ExportFormat::jpeg(7.0), ExportFormat::Jpeg { quality: 100 });
    assert_eq!(ExportFormat::jpeg(-1.0), ExportFormat::Jpeg { quality: 1 });
}

#[test]
fn data_uri_has_mime_prefix() {
    let enc = encode_surface(&white_surface(1, 1), ExportFormat::Png).unwrap();
    let uri = enc.to_data_uri();
    assert!(uri.starts_with("data:image/png;base64,"));
    let (mime, bytes) = crate::assets::decode::decode_data_uri(&uri).unwrap();
    assert_eq!(mime, "image/png");
    assert_eq!(bytes, enc.bytes);
}
