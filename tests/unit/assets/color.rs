use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: ColorDef = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, ColorDef::rgba(1.0, 0.0, 0.0, 1.0));

    let c: ColorDef = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-6);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-6);

    let c: ColorDef = "#0f0".parse().unwrap();
    assert_eq!(c, ColorDef::rgba(0.0, 1.0, 0.0, 1.0));
}

#[test]
fn parses_css_names() {
    let c: ColorDef = "Red".parse().unwrap();
    assert_eq!(c.to_rgba8_premul().to_array(), [255, 0, 0, 255]);

    let c: ColorDef = serde_json::from_value(json!("transparent")).unwrap();
    assert_eq!(c.to_rgba8_premul(), Rgba8Premul::transparent());

    assert!("not-a-color".parse::<ColorDef>().is_err());
}

#[test]
fn parses_rgba_object_and_array() {
    let c: ColorDef = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, ColorDef::rgba(0.25, 0.5, 0.75, 1.0));

    let c: ColorDef = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, ColorDef::rgba(0.25, 0.5, 0.75, 0.9));

    assert!(serde_json::from_value::<ColorDef>(json!([0.1, 0.2])).is_err());
}

#[test]
fn parses_hsla_object() {
    let c: ColorDef = serde_json::from_value(json!({"h": 0.0, "s": 1.0, "l": 0.5})).unwrap();
    // Pure red.
    assert!((c.r - 1.0).abs() < 1e-6);
    assert!(c.g.abs() < 1e-6);
    assert!(c.b.abs() < 1e-6);
}

#[test]
fn parses_css_functional_notation() {
    let c: ColorDef = "rgb(255, 0, 0)".parse().unwrap();
    assert_eq!(c.to_rgba8_premul().to_array(), [255, 0, 0, 255]);

    let c: ColorDef = "hsl(120, 100%, 50%)".parse().unwrap();
    assert_eq!(c.to_rgba8_premul().to_array(), [0, 255, 0, 255]);

    let c: ColorDef = "rgba(0, 0, 255, 0.5)".parse().unwrap();
    assert!((c.a - 0.5).abs() < 1e-6);
    assert_eq!(c.to_rgba8_premul().to_array(), [0, 0, 128, 128]);

    let c: ColorDef = serde_json::from_value(json!("cornflowerblue")).unwrap();
    assert_eq!(c.to_rgba8_premul().to_array(), [100, 149, 237, 255]);

    let f: Fill = "rebeccapurple".parse().unwrap();
    let Fill::Solid(c) = f else {
        panic!("expected a solid fill, got {f:?}");
    };
    assert_eq!(c.to_rgba8_premul().to_array(), [102, 51, 153, 255]);
}

#[test]
fn fill_accepts_bare_color_and_tagged_kinds() {
    let f: Fill = serde_json::from_value(json!("red")).unwrap();
    assert_eq!(f, Fill::Solid(ColorDef::rgb8(255, 0, 0)));

    let f: Fill = serde_json::from_value(json!({"solid": "#000000"})).unwrap();
    assert_eq!(f, Fill::Solid(ColorDef::rgb8(0, 0, 0)));

    let f: Fill = serde_json::from_value(json!({
        "linear_gradient": {
            "from": {"x": 0.0, "y": 0.0},
            "to": {"x": 10.0, "y": 0.0},
            "stops": [
                {"offset": 0.0, "color": "black"},
                {"offset": 1.0, "color": "white"}
            ]
        }
    }))
    .unwrap();
    assert!(matches!(f, Fill::LinearGradient { ref stops, .. } if stops.len() == 2));

    let f: Fill = serde_json::from_value(json!({
        "pattern": {"source": "tile.png", "repeat": "repeat-x"}
    }))
    .unwrap();
    assert_eq!(f.pattern_source(), Some("tile.png"));
    assert!(matches!(
        f,
        Fill::Pattern {
            repeat: PatternRepeat::RepeatX,
            ..
        }
    ));
}

#[test]
fn fill_from_str_handles_color_and_json() {
    let f: Fill = "blue".parse().unwrap();
    assert_eq!(f, Fill::Solid(ColorDef::rgb8(0, 0, 255)));

    let f: Fill = r#"{"radial_gradient": {"center": {"x": 5.0, "y": 5.0}, "radius": 5.0, "stops": []}}"#
        .parse()
        .unwrap();
    assert!(matches!(f, Fill::RadialGradient { radius, .. } if radius == 5.0));
}

#[test]
fn ramp_clamps_and_interpolates() {
    let ramp = Ramp::new(&[
        ColorStop {
            offset: 1.0,
            color: ColorDef::rgb8(255, 255, 255),
        },
        ColorStop {
            offset: 0.0,
            color: ColorDef::rgb8(0, 0, 0),
        },
    ])
    .unwrap();
    assert_eq!(ramp.sample(-1.0).to_array(), [0, 0, 0, 255]);
    assert_eq!(ramp.sample(2.0).to_array(), [255, 255, 255, 255]);
    let mid = ramp.sample(0.5);
    assert!((i32::from(mid.r) - 128).abs() <= 1);
    assert_eq!(mid.a, 255);
}

#[test]
fn ramp_without_stops_is_transparent() {
    let ramp = Ramp::new(&[]).unwrap();
    assert_eq!(ramp.sample(0.3), Rgba8Premul::transparent());
}

#[test]
fn ramp_rejects_out_of_range_offsets() {
    let bad = [ColorStop {
        offset: 1.5,
        color: ColorDef::rgb8(0, 0, 0),
    }];
    assert!(Ramp::new(&bad).is_err());
}

#[test]
fn degenerate_gradients_have_no_offset() {
    let p = Point::new(1.0, 1.0);
    assert_eq!(linear_offset(p, p, Point::new(3.0, 3.0)), None);
    assert_eq!(radial_offset(p, 0.0, p), None);
    let t = linear_offset(Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 7.0));
    assert_eq!(t, Some(0.5));
}
