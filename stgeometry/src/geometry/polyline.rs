//! The polyline entity.
//!
//! The body is grouped by ordinate rather than by point:
//!
//! ```text
//! X1 Y1 dX2 dY2 ... dXn dYn | Z1 dZ2 ... dZn
//! ```
//!
//! The first point is stored absolutely, every other one as its difference
//! from the point before it. The Z block is only present when the header
//! announces Z.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::coordinates::Axis;
use crate::coordinates::CoordinateSystem;
use crate::delta::Delta;
use crate::error::Error;
use crate::geometry::coordinate::Coordinate;
use crate::geometry::point::Point;
use crate::geometry::text::{self, GeometryText, Keyword};
use crate::geometry::{Extent, StGeometry};
use crate::header::{Dimension, GeometryHeader, HEADER_LEN};
use crate::runs::split_runs;

/// Fewest points a polyline holds.
const MIN_POINTS: usize = 2;

/// An immutable polyline with its derived extent, lengths and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    points: Vec<Point>,
    dimension: Dimension,
    extent: Extent,
    length_2d: Decimal,
    length_3d: Option<Decimal>,
    bytes: Vec<u8>,
}

impl Polyline {
    /// Builds a polyline from its points, composing its payload.
    ///
    /// ## Errors
    /// - `TooFewPoints` for fewer than two points
    /// - `MixedDimensions` when a point does not share the dimension of
    ///   the first one
    pub fn new(points: Vec<Point>, system: &CoordinateSystem) -> Result<Self, Error> {
        let dimension = check_points(&points)?;
        if dimension.has_m() {
            return Err(Error::MeasureNotSupported);
        }

        let mut body = Vec::new();
        let mut z_block = Vec::new();

        let (first, rest) = points
            .split_first()
            .ok_or(Error::TooFewPoints(points.len()))?;
        body.extend_from_slice(first.x().bytes());
        body.extend_from_slice(first.y().bytes());
        if let Some(z) = first.z() {
            z_block.extend_from_slice(z.bytes());
        }

        let mut previous = first;
        for point in rest {
            body.extend(difference(point.x(), previous.x(), system)?);
            body.extend(difference(point.y(), previous.y(), system)?);
            if let (Some(z), Some(previous_z)) = (point.z(), previous.z()) {
                z_block.extend(difference(z, previous_z, system)?);
            }
            previous = point;
        }
        body.extend(z_block);

        let header = GeometryHeader::encode(dimension, body.len(), system)?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
        bytes.extend_from_slice(&header);
        bytes.extend(body);

        Self::assemble(points, dimension, bytes)
    }

    /// Decodes a polyline payload. The payload is kept as given.
    ///
    /// ## Errors
    /// - `MeasureNotSupported` when the header announces an M ordinate
    /// - `RunCountMismatch` when the body cannot hold whole points: an
    ///   even count of at least 4 runs when planar, a multiple of 3 of at
    ///   least 6 runs with Z
    pub fn from_bytes(payload: &[u8], system: &CoordinateSystem) -> Result<Self, Error> {
        let dimension = GeometryHeader::decode(payload)?;
        if dimension.has_m() {
            return Err(Error::MeasureNotSupported);
        }

        let runs = split_runs(GeometryHeader::body(payload)?)?;
        let count = runs.len();
        let whole_points = match dimension.has_z() {
            true => count % 3 == 0 && count >= 3 * MIN_POINTS,
            false => count % 2 == 0 && count >= 2 * MIN_POINTS,
        };
        if !whole_points {
            return Err(Error::RunCountMismatch {
                geometry: "linestring",
                actual: count,
            });
        }

        let (xy_runs, z_runs) = match dimension.has_z() {
            true => runs.split_at(count / 3 * 2),
            false => (runs.as_slice(), &[][..]),
        };

        let mut points: Vec<Point> = Vec::with_capacity(xy_runs.len() / 2);
        for (index, pair) in xy_runs.chunks_exact(2).enumerate() {
            let z_run = z_runs.get(index).copied();
            let point = match points.last() {
                None => {
                    let x = Coordinate::from_bytes(pair[0], Axis::X, system)?;
                    let y = Coordinate::from_bytes(pair[1], Axis::Y, system)?;
                    let z = z_run
                        .map(|run| Coordinate::from_bytes(run, Axis::Z, system))
                        .transpose()?;
                    Point::from_coordinates(x, y, z, None, system)?
                }
                Some(previous) => {
                    let x = absolute(pair[0], previous.x(), system)?;
                    let y = absolute(pair[1], previous.y(), system)?;
                    let z = match (z_run, previous.z()) {
                        (Some(run), Some(previous_z)) => Some(absolute(run, previous_z, system)?),
                        _ => None,
                    };
                    Point::from_coordinates(x, y, z, None, system)?
                }
            };
            points.push(point);
        }

        Self::assemble(points, dimension, payload.to_vec())
    }

    /// Parses a `LINESTRING [Z][M] (x y [z] [m], ...)` coordinate-text.
    pub fn from_wkt(text: &str, system: &CoordinateSystem) -> Result<Self, Error> {
        Self::from_text(text.parse()?, system)
    }

    pub(crate) fn from_text(text: GeometryText, system: &CoordinateSystem) -> Result<Self, Error> {
        if text.keyword != Keyword::LineString {
            return Err(Error::InvalidText(format!(
                "expected LINESTRING, found {}",
                text.keyword.as_str()
            )));
        }
        if text.points.len() < MIN_POINTS {
            return Err(Error::TooFewPoints(text.points.len()));
        }

        let points = text
            .points
            .iter()
            .map(|ordinates| Point::from_ordinates(ordinates, text.dimension, system))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(points, system)
    }

    /// Computes the derived values once the points and the payload are
    /// known.
    fn assemble(points: Vec<Point>, dimension: Dimension, bytes: Vec<u8>) -> Result<Self, Error> {
        let mut extent = points
            .first()
            .map(Extent::of_point)
            .ok_or(Error::TooFewPoints(0))?;
        let mut length_2d = Decimal::ZERO;
        let mut length_3d = dimension.has_z().then_some(Decimal::ZERO);

        for pair in points.windows(2) {
            let (previous, point) = (&pair[0], &pair[1]);
            extent.include(point);

            let dx = point.x().value() - previous.x().value();
            let dy = point.y().value() - previous.y().value();
            let segment = hypot(dx, dy)?;
            length_2d = length_2d
                .checked_add(segment)
                .ok_or(Error::ArithmeticOverflow("2D length"))?;

            if let (Some(total), Some(z), Some(previous_z)) = (length_3d, point.z(), previous.z()) {
                let dz = z.value() - previous_z.value();
                let segment = hypot(segment, dz)?;
                length_3d = Some(
                    total
                        .checked_add(segment)
                        .ok_or(Error::ArithmeticOverflow("3D length"))?,
                );
            }
        }

        tracing::debug!(
            ?dimension,
            points = points.len(),
            bytes = bytes.len(),
            "built linestring"
        );

        Ok(Self {
            points,
            dimension,
            extent,
            length_2d,
            length_3d,
            bytes,
        })
    }

    /// The points, in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Sum of the planar lengths of every segment.
    pub fn length_2d(&self) -> Decimal {
        self.length_2d
    }

    /// Sum of the 3D lengths of every segment. `None` without Z.
    pub fn length_3d(&self) -> Option<Decimal> {
        self.length_3d
    }

    /// The 8-byte header of the payload.
    pub fn header(&self) -> &[u8] {
        &self.bytes[..HEADER_LEN]
    }
}

impl StGeometry for Polyline {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn num_points(&self) -> usize {
        self.points.len()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn extent(&self) -> Extent {
        self.extent
    }
}

impl std::fmt::Display for Polyline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let positions: Vec<String> = self.points.iter().map(Point::ordinates_text).collect();
        write!(
            f,
            "{} ({})",
            text::prefix(Keyword::LineString, self.dimension),
            positions.join(", ")
        )
    }
}

/// Returns the shared dimension of the points.
fn check_points(points: &[Point]) -> Result<Dimension, Error> {
    let [first, rest @ ..] = points else {
        return Err(Error::TooFewPoints(0));
    };
    if points.len() < MIN_POINTS {
        return Err(Error::TooFewPoints(points.len()));
    }

    let dimension = first.dimension();
    match rest.iter().position(|point| point.dimension() != dimension) {
        Some(offset) => Err(Error::MixedDimensions { index: offset + 1 }),
        None => Ok(dimension),
    }
}

fn difference(
    current: &Coordinate,
    previous: &Coordinate,
    system: &CoordinateSystem,
) -> Result<Vec<u8>, Error> {
    Delta::encode_difference(current.bytes(), previous.bytes(), current.axis(), system)
}

fn absolute(
    difference: &[u8],
    previous: &Coordinate,
    system: &CoordinateSystem,
) -> Result<Coordinate, Error> {
    let axis = previous.axis();
    let bytes = Delta::decode_difference(difference, previous.bytes(), axis, system)?;
    Coordinate::from_bytes(&bytes, axis, system)
}

fn hypot(a: Decimal, b: Decimal) -> Result<Decimal, Error> {
    a.checked_mul(a)
        .zip(b.checked_mul(b))
        .and_then(|(a2, b2)| a2.checked_add(b2))
        .and_then(|sum| sum.sqrt())
        .ok_or(Error::ArithmeticOverflow("segment length"))
}
