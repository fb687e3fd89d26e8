use std::io::Write;

use stgeometry::config::Settings;
use stgeometry::testing::dec;
use stgeometry::{Axis, Point, StGeometry};

use test_log::test;

const PLANAR_TOML: &str = r#"
[coordinate_system]
srid = 3857
resolution = "0.0001"
min_x = "-20037700"
min_y = "-30241100"
"#;

/// The only test in this binary touching the environment.
#[test]
fn environment_overrides_the_config_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(PLANAR_TOML.as_bytes()).unwrap();

    let cs = Settings::new(Some(file.path()))
        .unwrap()
        .coordinate_system()
        .unwrap();
    assert!(!cs.has_z());

    std::env::set_var("STGEOMETRY_COORDINATE_SYSTEM__MIN_Z", "-100000");
    std::env::set_var("STGEOMETRY_COORDINATE_SYSTEM__SRID_NAME", "web mercator");
    let settings = Settings::new(Some(file.path()));
    std::env::remove_var("STGEOMETRY_COORDINATE_SYSTEM__MIN_Z");
    std::env::remove_var("STGEOMETRY_COORDINATE_SYSTEM__SRID_NAME");

    let cs = settings.unwrap().coordinate_system().unwrap();
    assert_eq!(cs.min(Axis::Z).unwrap(), dec("-100000"));
    assert_eq!(cs.srid_name(), Some("web mercator"));

    let point = Point::from_wkt("POINT Z (0 0 0)", &cs).unwrap();
    assert!(point.has_z());
    assert_eq!(&point.as_bytes()[20..], &[128, 168, 214, 185, 7]);
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(Settings::new(Some("/nonexistent/stgeometry.toml")).is_err());
}
