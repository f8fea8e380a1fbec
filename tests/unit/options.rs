use super::*;
use crate::assets::color::ColorDef;

#[test]
fn defaults_match_documented_values() {
    let o = Options::default();
    assert_eq!(o.gap, 0);
    assert_eq!(o.direction, Direction::Horizontal);
    assert_eq!(o.format, OutputFormat::Png);
    assert!((o.quality - 0.92).abs() < 1e-6);
    assert!(o.color.is_none());
}

#[test]
fn json_subset_falls_back_to_defaults() {
    let o = Options::from_json_str(r#"{"direction": "vertical", "gap": 100, "color": "red"}"#)
        .unwrap();
    assert_eq!(o.direction, Direction::Vertical);
    assert_eq!(o.gap, 100);
    assert_eq!(o.format, OutputFormat::Png);
    assert!((o.quality - DEFAULT_QUALITY).abs() < 1e-6);
    assert_eq!(o.color, Some(Fill::Solid(ColorDef::rgb8(255, 0, 0))));

    let o = Options::from_json_str("{}").unwrap();
    assert_eq!(o, Options::default());
}

#[test]
fn type_field_uses_mime_strings() {
    let o = Options::from_json_str(r#"{"type": "image/jpeg", "quality": 0.5}"#).unwrap();
    assert_eq!(o.format, OutputFormat::Jpeg);

    let v = serde_json::to_value(&o).unwrap();
    assert_eq!(v["type"], "image/jpeg");

    let err = Options::from_json_str(r#"{"type": "image/gif"}"#).unwrap_err();
    assert!(matches!(err, WireError::Serde(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(Options::from_json_str(r#"{"gapp": 1}"#).is_err());
    assert!(PartialOptions::from_json_str(r#"{"colour": "red"}"#).is_err());
}

#[test]
fn partial_merge_is_shallow_override() {
    let base = Options::default()
        .with_gap(3)
        .with_color(Fill::Solid(ColorDef::rgb8(0, 0, 0)));
    let partial = PartialOptions {
        direction: Some(Direction::Vertical),
        ..PartialOptions::default()
    };
    let merged = partial.merge_onto(base.clone());
    assert_eq!(merged.direction, Direction::Vertical);
    assert_eq!(merged.gap, 3);
    assert_eq!(merged.color, base.color);
}

#[test]
fn overlay_prefers_later_layer() {
    let file = PartialOptions::from_json_str(r#"{"gap": 4, "type": "image/webp"}"#).unwrap();
    let flags = PartialOptions {
        gap: Some(9),
        ..PartialOptions::default()
    };
    let o: Options = file.overlay(flags).into();
    assert_eq!(o.gap, 9);
    assert_eq!(o.format, OutputFormat::WebP);
}

#[test]
fn quality_out_of_range_is_encode_error() {
    assert!(Options::default().validate().is_ok());
    for q in [-0.1, 1.5, f32::NAN] {
        let err = Options::default().with_quality(q).validate().unwrap_err();
        assert!(matches!(err, WireError::Encode(_)));
    }
}

#[test]
fn direction_and_format_parse_from_cli_strings() {
    assert_eq!("Vertical".parse::<Direction>().unwrap(), Direction::Vertical);
    assert!("diagonal".parse::<Direction>().is_err());
    assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
    assert_eq!(
        "image/webp".parse::<OutputFormat>().unwrap(),
        OutputFormat::WebP
    );
    assert_eq!(Direction::Vertical.main_axis(), Axis::Height);
    assert_eq!(Direction::Horizontal.cross_axis(), Axis::Height);
}

#[test]
fn quality_applies_to_jpeg_and_webp() {
    assert!(!OutputFormat::Png.is_lossy());
    assert!(OutputFormat::Jpeg.is_lossy());
    assert!(OutputFormat::WebP.is_lossy());
}
