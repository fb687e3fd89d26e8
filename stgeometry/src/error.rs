//! Top-level error type for the stgeometry library
//!

use rust_decimal::Decimal;

use crate::coordinates::Axis;

/// The broad class of a failure. Callers in a persistence layer treat
/// every kind as fatal for the geometry being processed, never for the
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The coordinate system is missing a required setting or is
    /// internally inconsistent.
    Configuration,
    /// The byte payload or the coordinate-text cannot describe a valid
    /// geometry.
    MalformedPayload,
    /// The input asks for something this codec does not implement (the M
    /// ordinate, polygons).
    UnsupportedFeature,
    /// A value cannot be represented in the encoding space.
    RangeOverflow,
}

/// Errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The resolution must be strictly positive.
    #[error("the resolution must be strictly positive, got {0}")]
    InvalidResolution(Decimal),

    /// The byte radii cannot produce strictly increasing byte scales.
    #[error("invalid byte radii: {0}")]
    InvalidByteRadii(&'static str),

    /// The restart marker leaves no room for the sign flag of a leading
    /// byte.
    #[error("invalid restart marker {0}: the sign-flagged leading byte would exceed 255")]
    InvalidRestartMarker(u8),

    /// A configured maximum is lower than the matching minimum.
    #[error("the configured {axis} range is empty: max {max} is lower than min {min}")]
    EmptyAxisRange {
        /// The axis with the bad bounds
        axis: Axis,
        /// Configured minimum
        min: Decimal,
        /// Configured maximum
        max: Decimal,
    },

    /// The byte scales overflowed while being derived from the radii.
    #[error("byte scale at level {0} overflows")]
    ByteScaleOverflow(usize),

    /// A Z ordinate was used with a coordinate system that has no Z origin.
    #[error("the coordinate system was not configured for Z ordinates; provide a minimum Z")]
    ZAxisNotConfigured,

    /// The payload is shorter than the fixed header.
    #[error("the payload holds {0} bytes, fewer than the 8-byte header")]
    PayloadTooShort(usize),

    /// The dimension byte of the header is outside 0..=3.
    #[error("unsupported geometry dimension flag: {0}")]
    UnsupportedDimension(u8),

    /// The body did not split into the number of runs the geometry needs.
    #[error("cannot create a {geometry} from {actual} encoded values")]
    RunCountMismatch {
        /// Kind of geometry being decoded
        geometry: &'static str,
        /// Number of runs found in the body
        actual: usize,
    },

    /// The body ended in the middle of a run.
    #[error("the payload ends with an unterminated encoded value")]
    IncompleteRun,

    /// Attempted to decode an empty run.
    #[error("empty encoded value")]
    EmptyRun,

    /// A multi-byte run starts with a byte lacking the restart marker.
    #[error("the leading byte {0} of a multi-byte value lacks the restart marker")]
    InvalidLeadingByte(u8),

    /// A polyline needs at least two points.
    #[error("a linestring needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    /// A point does not share the dimension of the first point.
    #[error("point {index} does not have the same dimension as the first point")]
    MixedDimensions {
        /// Position of the offending point
        index: usize,
    },

    /// The coordinate-text could not be parsed.
    #[error("invalid coordinate text: {0}")]
    InvalidText(String),

    /// A numeric literal in the coordinate-text could not be parsed.
    #[error("invalid number in coordinate text: {0}")]
    InvalidNumber(String),

    /// The M ordinate codec path is not implemented.
    #[error("M ordinates are not supported")]
    MeasureNotSupported,

    /// The entity code of the external binding names a geometry kind this
    /// codec does not implement.
    #[error("unsupported geometry entity code: {0}")]
    UnsupportedEntity(i32),

    /// An encoded byte would fall outside the representable range.
    #[error("{value} cannot be encoded on the {axis} axis: a byte would fall outside its range")]
    ByteOverflow {
        /// The axis being encoded
        axis: Axis,
        /// The value being encoded
        value: Decimal,
    },

    /// The run needs more levels than the byte radii provide.
    #[error("encoded value of {0} bytes exceeds the available byte levels")]
    RunTooLong(usize),

    /// The body byte count does not fit in the 4 header bytes.
    #[error("body byte count {0} does not fit in the geometry header")]
    CountTooLarge(usize),

    /// Decimal arithmetic overflowed.
    #[error("arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),
}

impl Error {
    /// Returns the class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidResolution(_)
            | Error::InvalidByteRadii(_)
            | Error::InvalidRestartMarker(_)
            | Error::EmptyAxisRange { .. }
            | Error::ByteScaleOverflow(_)
            | Error::ZAxisNotConfigured => ErrorKind::Configuration,

            Error::PayloadTooShort(_)
            | Error::UnsupportedDimension(_)
            | Error::RunCountMismatch { .. }
            | Error::IncompleteRun
            | Error::EmptyRun
            | Error::InvalidLeadingByte(_)
            | Error::TooFewPoints(_)
            | Error::MixedDimensions { .. }
            | Error::InvalidText(_)
            | Error::InvalidNumber(_) => ErrorKind::MalformedPayload,

            Error::MeasureNotSupported | Error::UnsupportedEntity(_) => {
                ErrorKind::UnsupportedFeature
            }

            Error::ByteOverflow { .. }
            | Error::RunTooLong(_)
            | Error::CountTooLarge(_)
            | Error::ArithmeticOverflow(_) => ErrorKind::RangeOverflow,
        }
    }
}
