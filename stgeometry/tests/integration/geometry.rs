use assert_matches::assert_matches;
use more_asserts::assert_ge;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use test_case::test_case;

use stgeometry::testing::{dec, web_mercator, web_mercator_planar};
use stgeometry::{Error, ErrorKind, Geometry, GeometryKind, Point, Polyline, StGeometry};

use test_log::test;

#[test]
fn origin_point_round_trip() {
    let cs = web_mercator_planar();
    let point = Point::new(Decimal::ZERO, Decimal::ZERO, None, None, &cs).unwrap();

    let decoded = Point::from_bytes(point.as_bytes(), &cs).unwrap();
    assert_eq!(decoded.x().value(), Decimal::ZERO);
    assert_eq!(decoded.y().value(), Decimal::ZERO);
    assert!(!decoded.has_z());
    assert_eq!(decoded.to_string(), "POINT (0 0)");
}

#[test]
fn point_with_z_renders_as_text() {
    let cs = web_mercator();
    let point = Point::new(dec("0.0001"), dec("0.0002"), Some(dec("10")), None, &cs).unwrap();

    assert_eq!(point.to_string(), "POINT Z (0.0001 0.0002 10)");
}

#[test]
fn five_run_point_payload_is_malformed() {
    let cs = web_mercator();
    let payload = [5, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0];

    let err = Point::from_bytes(&payload, &cs).unwrap_err();
    assert_matches!(err, Error::RunCountMismatch { actual: 5, .. });
    assert_eq!(err.kind(), ErrorKind::MalformedPayload);
}

#[test]
fn polyline_lengths() {
    let cs = web_mercator();
    let planar = Polyline::from_wkt("LINESTRING (0 0, 1 1)", &cs).unwrap();
    let with_z = Polyline::from_wkt("LINESTRING Z (0 0 0, 1 1 1)", &cs).unwrap();
    let sqrt_2 = Decimal::TWO.sqrt().unwrap();

    assert_eq!(planar.length_2d().round_dp(8), sqrt_2.round_dp(8));
    assert_eq!(with_z.length_2d(), planar.length_2d());
    assert_ge!(with_z.length_3d().unwrap(), with_z.length_2d());
}

#[test_case(GeometryKind::Point, "POINT Z (-20037700 -30241100 -100000)" ; "point at the origin")]
#[test_case(GeometryKind::LineString, "LINESTRING (10.5 -3.25, 11 -3, 9.0001 1000)" ; "planar linestring")]
#[test_case(GeometryKind::LineStringZ, "LINESTRING Z (1 2 3, 4 5 6, -7 -8 -9)" ; "linestring with z")]
fn text_payload_round_trip(kind: GeometryKind, text: &str) {
    let cs = web_mercator();
    let geometry = Geometry::from_text(text, &cs).unwrap();
    assert_eq!(geometry.kind(), kind);

    let entity = GeometryKind::from_entity(kind.entity()).unwrap();
    let decoded = Geometry::from_payload(entity, geometry.as_bytes(), &cs).unwrap();

    assert_eq!(decoded, geometry);
    assert_eq!(decoded.to_string(), text);
}

#[test]
fn origin_encodes_to_a_single_zero_byte() {
    let cs = web_mercator();
    let point = Point::new(dec("-20037700"), dec("-30241100"), Some(dec("-100000")), None, &cs)
        .unwrap();

    assert_eq!(point.as_bytes(), &[3, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0]);
}

#[test]
fn summary_of_a_decoded_polyline() {
    let cs = web_mercator();
    let payload = hex::decode("1a000000010100008081b3f6d40b80a3cd91cd11909c01909c0180a8d6b907909c01")
        .unwrap();

    let geometry = Geometry::from_payload(GeometryKind::LineStringZ, &payload, &cs).unwrap();
    assert_eq!(geometry.to_string(), "LINESTRING Z (0 0 0, 1 1 1)");

    let summary = geometry.summary(&cs);
    assert_eq!(summary.entity, GeometryKind::LineStringZ.entity());
    assert_eq!(summary.numpts, 2);
    assert_eq!(summary.extent.min_z, Some(dec("0")));
    assert_eq!(summary.extent.max_z, Some(dec("1")));
    assert_eq!(summary.points, payload);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["points"], hex::encode(&payload));
    assert_eq!(json["entity"], 4);
}

#[test]
fn polygons_are_unsupported() {
    let err = GeometryKind::from_entity(8).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
}

#[test]
fn z_requires_a_z_origin() {
    let err = Geometry::from_text("POINT Z (1 2 3)", &web_mercator_planar()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn values_outside_the_encoding_space_overflow() {
    let cs = web_mercator();
    let err = Point::new(dec("5000000000000"), Decimal::ZERO, None, None, &cs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RangeOverflow);
}
