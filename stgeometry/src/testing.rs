//! Fixtures shared by unit and integration tests.

use rust_decimal::Decimal;

use crate::coordinates::CoordinateSystem;

/// The SRID of the Web Mercator fixture.
pub const WEB_MERCATOR_SRID: i32 = 3857;

/// Parses a decimal literal, panicking on bad input. Test helper only.
pub fn dec(text: &str) -> Decimal {
    text.parse()
        .unwrap_or_else(|err| panic!("bad decimal literal {text:?}: {err}"))
}

/// The Web Mercator coordinate system of the reference deployment, with a
/// Z origin.
pub fn web_mercator() -> CoordinateSystem {
    CoordinateSystem::builder(
        WEB_MERCATOR_SRID,
        dec("0.0001"),
        dec("-20037700"),
        dec("-30241100"),
    )
    .srid_name("WGS_1984_Web_Mercator_Auxiliary_Sphere")
    .tolerance(dec("0.001"))
    .max_x(dec("900699887774.099"))
    .max_y(dec("900689684374.099"))
    .min_z(dec("-100000"))
    .max_z(dec("900719825474.099"))
    .build()
    .expect("the web mercator fixture is valid")
}

/// The Web Mercator coordinate system without a Z origin.
pub fn web_mercator_planar() -> CoordinateSystem {
    CoordinateSystem::builder(
        WEB_MERCATOR_SRID,
        dec("0.0001"),
        dec("-20037700"),
        dec("-30241100"),
    )
    .max_x(dec("900699887774.099"))
    .max_y(dec("900689684374.099"))
    .build()
    .expect("the planar web mercator fixture is valid")
}
