#![deny(missing_docs)]

//! # Esri ST_Geometry Codec
//!
//! Encoding and decoding of the compact binary payload spatial databases
//! store for ST_Geometry points and polylines, and of their coordinate-text
//! notation.
//!
//! Every operation takes the [`CoordinateSystem`] the payloads were written
//! against. It must match the one of the feature class that produced them.

pub mod config;
pub mod coordinates;
pub mod delta;
pub mod error;
pub mod geometry;
pub mod header;
pub mod logging;
pub mod runs;
pub mod varint;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use coordinates::Axis;
pub use coordinates::CoordinateSystem;
pub use error::Error;
pub use error::ErrorKind;
pub use geometry::Coordinate;
pub use geometry::Geometry;
pub use geometry::GeometryKind;
pub use geometry::GeometrySummary;
pub use geometry::Point;
pub use geometry::Polyline;
pub use geometry::StGeometry;
pub use header::Dimension;
