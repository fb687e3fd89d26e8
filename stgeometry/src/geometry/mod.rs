//! # Geometry Entities
//!
//! Points and polylines own their ordinates and their full payload. Both
//! are immutable: every derived value (extent, lengths, payload) is
//! computed once at construction.
//!
//! The payload alone does not tell a point from a polyline, so decoding
//! through [`Geometry::from_payload`] takes the [`GeometryKind`] carried
//! beside it.

mod coordinate;
mod point;
mod polyline;
mod text;

use rust_decimal::Decimal;
use serde::Serialize;
use serde::Serializer;

pub use coordinate::Coordinate;
pub use point::Point;
pub use polyline::Polyline;

use crate::coordinates::CoordinateSystem;
use crate::error::Error;
use crate::header::Dimension;
use text::{GeometryText, Keyword};

/// The capability shared by every geometry entity.
pub trait StGeometry {
    /// Which optional ordinates the geometry carries.
    fn dimension(&self) -> Dimension;

    /// Number of points.
    fn num_points(&self) -> usize;

    /// The full payload, header included.
    fn as_bytes(&self) -> &[u8];

    /// Bounds of every ordinate.
    fn extent(&self) -> Extent;

    /// Whether the geometry carries Z ordinates.
    fn has_z(&self) -> bool {
        self.dimension().has_z()
    }

    /// Whether the geometry carries M ordinates.
    fn has_m(&self) -> bool {
        self.dimension().has_m()
    }
}

/// Componentwise bounds of the points of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extent {
    /// Smallest X
    pub min_x: Decimal,
    /// Largest X
    pub max_x: Decimal,
    /// Smallest Y
    pub min_y: Decimal,
    /// Largest Y
    pub max_y: Decimal,
    /// Smallest Z, when the geometry carries Z
    pub min_z: Option<Decimal>,
    /// Largest Z, when the geometry carries Z
    pub max_z: Option<Decimal>,
    /// Smallest M, when the geometry carries M
    pub min_m: Option<Decimal>,
    /// Largest M, when the geometry carries M
    pub max_m: Option<Decimal>,
}

impl Extent {
    /// The degenerate extent of a single point.
    pub fn of_point(point: &Point) -> Self {
        let z = point.z().map(Coordinate::value);
        let m = point.m().map(Coordinate::value);
        Self {
            min_x: point.x().value(),
            max_x: point.x().value(),
            min_y: point.y().value(),
            max_y: point.y().value(),
            min_z: z,
            max_z: z,
            min_m: m,
            max_m: m,
        }
    }

    /// Grows the extent to cover `point`.
    pub fn include(&mut self, point: &Point) {
        let x = point.x().value();
        let y = point.y().value();
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);

        let z = point.z().map(Coordinate::value);
        self.min_z = merge(self.min_z, z, Decimal::min);
        self.max_z = merge(self.max_z, z, Decimal::max);

        let m = point.m().map(Coordinate::value);
        self.min_m = merge(self.min_m, m, Decimal::min);
        self.max_m = merge(self.max_m, m, Decimal::max);
    }
}

fn merge(
    current: Option<Decimal>,
    value: Option<Decimal>,
    pick: fn(Decimal, Decimal) -> Decimal,
) -> Option<Decimal> {
    match (current, value) {
        (Some(current), Some(value)) => Some(pick(current, value)),
        (current, value) => current.or(value),
    }
}

/// The geometry kinds known to the persistence binding, with their entity
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum GeometryKind {
    /// A single point
    Point = 1,
    /// A planar polyline
    LineString = 2,
    /// A polyline with Z ordinates
    LineStringZ = 4,
}

impl GeometryKind {
    /// Resolves an entity code.
    ///
    /// ## Errors
    /// - `UnsupportedEntity` for any code but 1, 2 and 4
    pub fn from_entity(code: i32) -> Result<Self, Error> {
        match code {
            1 => Ok(GeometryKind::Point),
            2 => Ok(GeometryKind::LineString),
            4 => Ok(GeometryKind::LineStringZ),
            other => Err(Error::UnsupportedEntity(other)),
        }
    }

    /// The entity code.
    pub fn entity(self) -> i32 {
        self as i32
    }
}

/// Either geometry entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Geometry {
    /// A point
    Point(Point),
    /// A polyline
    Polyline(Polyline),
}

impl Geometry {
    /// Decodes a payload of the given kind.
    pub fn from_payload(
        kind: GeometryKind,
        payload: &[u8],
        system: &CoordinateSystem,
    ) -> Result<Self, Error> {
        match kind {
            GeometryKind::Point => Point::from_bytes(payload, system).map(Geometry::Point),
            GeometryKind::LineString | GeometryKind::LineStringZ => {
                Polyline::from_bytes(payload, system).map(Geometry::Polyline)
            }
        }
    }

    /// Parses a coordinate-text, dispatching on its keyword.
    pub fn from_text(text: &str, system: &CoordinateSystem) -> Result<Self, Error> {
        let parsed: GeometryText = text.parse()?;
        match parsed.keyword {
            Keyword::Point => Point::from_text(parsed, system).map(Geometry::Point),
            Keyword::LineString => Polyline::from_text(parsed, system).map(Geometry::Polyline),
        }
    }

    /// The kind recorded beside the payload.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Polyline(line) if line.has_z() => GeometryKind::LineStringZ,
            Geometry::Polyline(_) => GeometryKind::LineString,
        }
    }

    fn as_st_geometry(&self) -> &dyn StGeometry {
        match self {
            Geometry::Point(point) => point,
            Geometry::Polyline(line) => line,
        }
    }

    /// Computes the record stored beside the payload.
    pub fn summary(&self, system: &CoordinateSystem) -> GeometrySummary {
        let extent = self.extent();
        let len = match self {
            Geometry::Point(_) => Decimal::ZERO,
            Geometry::Polyline(line) => line.length_2d(),
        };

        GeometrySummary {
            entity: self.kind().entity(),
            numpts: self.num_points(),
            extent,
            area: Decimal::ZERO,
            len,
            srid: system.srid(),
            points: self.as_bytes().to_vec(),
        }
    }
}

impl StGeometry for Geometry {
    fn dimension(&self) -> Dimension {
        self.as_st_geometry().dimension()
    }

    fn num_points(&self) -> usize {
        self.as_st_geometry().num_points()
    }

    fn as_bytes(&self) -> &[u8] {
        self.as_st_geometry().as_bytes()
    }

    fn extent(&self) -> Extent {
        self.as_st_geometry().extent()
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Geometry::Point(point) => std::fmt::Display::fmt(point, f),
            Geometry::Polyline(line) => std::fmt::Display::fmt(line, f),
        }
    }
}

impl From<Point> for Geometry {
    fn from(point: Point) -> Self {
        Geometry::Point(point)
    }
}

impl From<Polyline> for Geometry {
    fn from(line: Polyline) -> Self {
        Geometry::Polyline(line)
    }
}

/// The values the persistence binding stores beside a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeometrySummary {
    /// Entity code of the geometry kind
    pub entity: i32,
    /// Number of points
    pub numpts: usize,
    /// Bounds of every ordinate
    #[serde(flatten)]
    pub extent: Extent,
    /// Always zero: no supported kind has an area
    pub area: Decimal,
    /// Planar length, zero for a point
    pub len: Decimal,
    /// Identifier of the coordinate system
    pub srid: i32,
    /// The payload
    #[serde(serialize_with = "hex_serializer")]
    pub points: Vec<u8>,
}

fn hex_serializer<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}
