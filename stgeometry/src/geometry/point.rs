//! The point entity.
//!
//! A point body is its ordinate runs in X, Y, Z, M order, each absolute.

use rust_decimal::Decimal;

use crate::coordinates::Axis;
use crate::coordinates::CoordinateSystem;
use crate::error::Error;
use crate::geometry::coordinate::Coordinate;
use crate::geometry::text::{self, GeometryText, Keyword};
use crate::geometry::{Extent, StGeometry};
use crate::header::{Dimension, GeometryHeader};
use crate::runs::split_runs;

/// An immutable point with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    x: Coordinate,
    y: Coordinate,
    z: Option<Coordinate>,
    m: Option<Coordinate>,
    bytes: Vec<u8>,
}

impl Point {
    /// Builds a point from its ordinate values.
    pub fn new(
        x: Decimal,
        y: Decimal,
        z: Option<Decimal>,
        m: Option<Decimal>,
        system: &CoordinateSystem,
    ) -> Result<Self, Error> {
        let x = Coordinate::from_value(x, Axis::X, system)?;
        let y = Coordinate::from_value(y, Axis::Y, system)?;
        let z = z
            .map(|z| Coordinate::from_value(z, Axis::Z, system))
            .transpose()?;
        let m = m
            .map(|m| Coordinate::from_value(m, Axis::M, system))
            .transpose()?;

        Self::from_coordinates(x, y, z, m, system)
    }

    /// Builds a point from already encoded ordinates, composing its
    /// payload.
    pub fn from_coordinates(
        x: Coordinate,
        y: Coordinate,
        z: Option<Coordinate>,
        m: Option<Coordinate>,
        system: &CoordinateSystem,
    ) -> Result<Self, Error> {
        let dimension = Dimension::from_flags(z.is_some(), m.is_some());

        let mut body = Vec::new();
        body.extend_from_slice(x.bytes());
        body.extend_from_slice(y.bytes());
        for ordinate in z.iter().chain(m.iter()) {
            body.extend_from_slice(ordinate.bytes());
        }

        let header = GeometryHeader::encode(dimension, body.len(), system)?;
        let mut bytes = Vec::with_capacity(header.len() + body.len());
        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(&body);

        Ok(Self { x, y, z, m, bytes })
    }

    /// Decodes a point payload. The payload is kept as given.
    ///
    /// ## Errors
    /// - `RunCountMismatch` unless the body holds exactly one run per
    ///   ordinate announced by the header
    /// - `MeasureNotSupported` when the header announces an M ordinate
    pub fn from_bytes(payload: &[u8], system: &CoordinateSystem) -> Result<Self, Error> {
        let dimension = GeometryHeader::decode(payload)?;
        let runs = split_runs(GeometryHeader::body(payload)?)?;

        if runs.len() != dimension.ordinates() {
            return Err(Error::RunCountMismatch {
                geometry: "point",
                actual: runs.len(),
            });
        }

        let x = Coordinate::from_bytes(runs[0], Axis::X, system)?;
        let y = Coordinate::from_bytes(runs[1], Axis::Y, system)?;
        let mut rest = runs[2..].iter();
        let z = match dimension.has_z() {
            true => rest
                .next()
                .map(|run| Coordinate::from_bytes(run, Axis::Z, system))
                .transpose()?,
            false => None,
        };
        let m = match dimension.has_m() {
            true => rest
                .next()
                .map(|run| Coordinate::from_bytes(run, Axis::M, system))
                .transpose()?,
            false => None,
        };

        tracing::debug!(?dimension, bytes = payload.len(), "decoded point");
        Ok(Self { x, y, z, m, bytes: payload.to_vec() })
    }

    /// Parses a `POINT [Z][M] (x y [z] [m])` coordinate-text.
    pub fn from_wkt(text: &str, system: &CoordinateSystem) -> Result<Self, Error> {
        Self::from_text(text.parse()?, system)
    }

    pub(crate) fn from_text(text: GeometryText, system: &CoordinateSystem) -> Result<Self, Error> {
        if text.keyword != Keyword::Point {
            return Err(Error::InvalidText(format!(
                "expected POINT, found {}",
                text.keyword.as_str()
            )));
        }
        let [ordinates] = text.points.as_slice() else {
            return Err(Error::InvalidText(format!(
                "a point holds exactly one position, found {}",
                text.points.len()
            )));
        };

        Self::from_ordinates(ordinates, text.dimension, system)
    }

    /// Builds a point from a parsed ordinate tuple laid out per
    /// `dimension`.
    pub(crate) fn from_ordinates(
        ordinates: &[Decimal],
        dimension: Dimension,
        system: &CoordinateSystem,
    ) -> Result<Self, Error> {
        let mut values = ordinates.iter().copied();
        let mut next = || {
            values.next().ok_or_else(|| {
                Error::InvalidText(format!(
                    "expected {} ordinates, found {}",
                    dimension.ordinates(),
                    ordinates.len()
                ))
            })
        };

        let x = next()?;
        let y = next()?;
        let z = dimension.has_z().then(&mut next).transpose()?;
        let m = dimension.has_m().then(&mut next).transpose()?;

        Self::new(x, y, z, m, system)
    }

    /// The X ordinate.
    pub fn x(&self) -> &Coordinate {
        &self.x
    }

    /// The Y ordinate.
    pub fn y(&self) -> &Coordinate {
        &self.y
    }

    /// The Z ordinate, if any.
    pub fn z(&self) -> Option<&Coordinate> {
        self.z.as_ref()
    }

    /// The M ordinate, if any.
    pub fn m(&self) -> Option<&Coordinate> {
        self.m.as_ref()
    }

    /// The ordinates as they appear inside the parentheses of the
    /// coordinate-text.
    pub(crate) fn ordinates_text(&self) -> String {
        let mut parts = vec![self.x.to_string(), self.y.to_string()];
        parts.extend(self.z.iter().chain(self.m.iter()).map(ToString::to_string));
        parts.join(" ")
    }
}

impl StGeometry for Point {
    fn dimension(&self) -> Dimension {
        Dimension::from_flags(self.z.is_some(), self.m.is_some())
    }

    fn num_points(&self) -> usize {
        1
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn extent(&self) -> Extent {
        Extent::of_point(self)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            text::prefix(Keyword::Point, self.dimension()),
            self.ordinates_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dec, web_mercator, web_mercator_planar};
    use assert_matches::assert_matches;
    use test_case::test_case;

    const ORIGIN_POINT: [u8; 20] = [
        12, 0, 0, 0, 1, 0, 0, 0, 128, 129, 179, 246, 212, 11, 128, 163, 205, 145, 205, 17,
    ];

    const POINT_Z: [u8; 25] = [
        17, 0, 0, 0, 1, 1, 0, 0, 129, 129, 179, 246, 212, 11, 130, 163, 205, 145, 205, 17, 160,
        194, 226, 185, 7,
    ];

    #[test]
    fn test_new_planar() {
        let cs = web_mercator();
        let point = Point::new(Decimal::ZERO, Decimal::ZERO, None, None, &cs).unwrap();

        assert_eq!(point.as_bytes(), &ORIGIN_POINT);
        assert!(!point.has_z());
        assert!(!point.has_m());
        assert_eq!(point.to_string(), "POINT (0 0)");
    }

    #[test]
    fn test_new_with_z() {
        let cs = web_mercator();
        let point = Point::new(dec("0.0001"), dec("0.0002"), Some(dec("10")), None, &cs).unwrap();

        assert_eq!(point.as_bytes(), &POINT_Z);
        assert!(point.has_z());
        assert_eq!(point.to_string(), "POINT Z (0.0001 0.0002 10)");
    }

    #[test]
    fn test_from_bytes() {
        let cs = web_mercator();
        let point = Point::from_bytes(&POINT_Z, &cs).unwrap();

        assert_eq!(point.x().value(), dec("0.0001"));
        assert_eq!(point.y().value(), dec("0.0002"));
        assert_eq!(point.z().map(Coordinate::value), Some(dec("10")));
        assert_eq!(point.m(), None);
        assert_eq!(point.as_bytes(), &POINT_Z);
    }

    #[test_case("POINT (0 0)", &ORIGIN_POINT ; "planar")]
    #[test_case("point z (0.0001 0.0002 10)", &POINT_Z ; "lowercase with z")]
    fn test_from_wkt(text: &str, expected: &[u8]) {
        let cs = web_mercator();
        let point = Point::from_wkt(text, &cs).unwrap();

        assert_eq!(point.as_bytes(), expected);
        assert_eq!(Point::from_bytes(point.as_bytes(), &cs).unwrap(), point);
    }

    #[test]
    fn test_five_runs_rejected() {
        let cs = web_mercator();
        let mut payload = POINT_Z.to_vec();
        payload.extend_from_slice(&[0, 0]);

        assert_matches!(
            Point::from_bytes(&payload, &cs),
            Err(Error::RunCountMismatch { geometry: "point", actual: 5 })
        );
    }

    #[test]
    fn test_missing_z_run_rejected() {
        let cs = web_mercator();
        let mut payload = ORIGIN_POINT.to_vec();
        payload[5] = 1;

        assert_matches!(
            Point::from_bytes(&payload, &cs),
            Err(Error::RunCountMismatch { actual: 2, .. })
        );
    }

    #[test_case("POINT M (1 2 3)" ; "measure")]
    #[test_case("POINT ZM (1 2 3 4)" ; "z and measure")]
    fn test_measure_unsupported(text: &str) {
        assert_matches!(
            Point::from_wkt(text, &web_mercator()),
            Err(Error::MeasureNotSupported)
        );
    }

    #[test]
    fn test_measure_payload_unsupported() {
        let mut payload = ORIGIN_POINT.to_vec();
        payload[5] = 2;
        payload.push(0);

        assert_matches!(
            Point::from_bytes(&payload, &web_mercator()),
            Err(Error::MeasureNotSupported)
        );
    }

    #[test]
    fn test_z_on_planar_system() {
        assert_matches!(
            Point::from_wkt("POINT Z (1 2 3)", &web_mercator_planar()),
            Err(Error::ZAxisNotConfigured)
        );
    }

    #[test_case("LINESTRING (0 0, 1 1)" ; "wrong keyword")]
    #[test_case("POINT (0 0, 1 1)" ; "two positions")]
    fn test_invalid_text(text: &str) {
        assert_matches!(
            Point::from_wkt(text, &web_mercator()),
            Err(Error::InvalidText(_))
        );
    }

    #[test]
    fn test_envelope_maximum() {
        let cs = web_mercator();
        let x = cs.max(Axis::X).unwrap();
        let y = cs.max(Axis::Y).unwrap();
        let z = cs.max(Axis::Z).unwrap();
        let run: [u8; 8] = [190, 255, 255, 255, 255, 255, 255, 31];

        let point = Point::new(x, y, Some(z), None, &cs).unwrap();
        let expected = [&[24, 0, 0, 0, 1, 1, 0, 0][..], &run, &run, &run].concat();
        assert_eq!(point.as_bytes(), expected.as_slice());

        let decoded = Point::from_bytes(point.as_bytes(), &cs).unwrap();
        assert_eq!(decoded, point);
        assert_eq!(
            decoded.to_string(),
            "POINT Z (900699887774.099 900689684374.099 900719825474.099)"
        );
        assert_eq!(Point::from_wkt(&decoded.to_string(), &cs).unwrap(), point);
    }

    #[test]
    fn test_sub_resolution_below_origin() {
        let cs = web_mercator();
        let origin = Point::new(dec("-20037700"), dec("-30241100"), None, None, &cs).unwrap();
        let below = Point::new(dec("-20037700.00005"), dec("-30241100"), None, None, &cs).unwrap();

        assert_eq!(below, origin);
        assert_eq!(Point::from_wkt(&below.to_string(), &cs).unwrap(), below);
    }

    #[test]
    fn test_extent() {
        let cs = web_mercator();
        let point = Point::new(dec("3"), dec("-4"), Some(dec("5")), None, &cs).unwrap();
        let extent = point.extent();

        assert_eq!((extent.min_x, extent.max_x), (dec("3"), dec("3")));
        assert_eq!((extent.min_y, extent.max_y), (dec("-4"), dec("-4")));
        assert_eq!((extent.min_z, extent.max_z), (Some(dec("5")), Some(dec("5"))));
        assert_eq!(extent.min_m, None);
    }
}
