//! # Geometry Header
//!
//! Every payload starts with eight bytes:
//!
//! | bytes | content                                                  |
//! |-------|----------------------------------------------------------|
//! | 0..4  | body length as an unsigned count, zero padded on the right |
//! | 4     | marker, always 1                                         |
//! | 5     | dimension flag (see [`Dimension`])                       |
//! | 6..8  | reserved, always 0                                       |
//!
//! Only the dimension flag is read back when building a geometry: the
//! body length is implied by the segmentation of the body.

use crate::coordinates::CoordinateSystem;
use crate::error::Error;
use crate::varint::Varint;

/// Length of the fixed header.
pub const HEADER_LEN: usize = 8;

/// Room for the body length at the start of the header.
const COUNT_LEN: usize = 4;

/// Position of the fixed marker byte.
const MARKER_INDEX: usize = 4;

/// Value of the fixed marker byte.
const MARKER: u8 = 1;

/// Position of the dimension flag.
const DIMENSION_INDEX: usize = 5;

/// Which optional ordinates a geometry carries. The discriminant is the
/// value of the header dimension flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Dimension {
    /// X and Y only
    Xy = 0,
    /// X, Y and Z
    Xyz = 1,
    /// X, Y and M
    Xym = 2,
    /// X, Y, Z and M
    Xyzm = 3,
}

impl Dimension {
    /// Returns the dimension matching the presence of each optional
    /// ordinate.
    pub fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => Dimension::Xy,
            (true, false) => Dimension::Xyz,
            (false, true) => Dimension::Xym,
            (true, true) => Dimension::Xyzm,
        }
    }

    /// Whether a Z ordinate is present.
    pub fn has_z(self) -> bool {
        matches!(self, Dimension::Xyz | Dimension::Xyzm)
    }

    /// Whether an M ordinate is present.
    pub fn has_m(self) -> bool {
        matches!(self, Dimension::Xym | Dimension::Xyzm)
    }

    /// Number of ordinates carried by a single point.
    pub fn ordinates(self) -> usize {
        2 + self.has_z() as usize + self.has_m() as usize
    }

    /// The tag written after the keyword in coordinate-text.
    pub fn tag(self) -> &'static str {
        match self {
            Dimension::Xy => "",
            Dimension::Xyz => "Z",
            Dimension::Xym => "M",
            Dimension::Xyzm => "ZM",
        }
    }
}

impl TryFrom<u8> for Dimension {
    type Error = Error;

    fn try_from(flag: u8) -> Result<Self, Self::Error> {
        match flag {
            0 => Ok(Dimension::Xy),
            1 => Ok(Dimension::Xyz),
            2 => Ok(Dimension::Xym),
            3 => Ok(Dimension::Xyzm),
            other => Err(Error::UnsupportedDimension(other)),
        }
    }
}

/// Encoding and decoding of the fixed header.
#[derive(Debug, Clone)]
pub struct GeometryHeader;

impl GeometryHeader {
    /// Builds the header of a geometry whose body holds `body_len` bytes.
    ///
    /// ## Errors
    /// - `CountTooLarge` when the body length needs more than 4 bytes
    pub fn encode(
        dimension: Dimension,
        body_len: usize,
        system: &CoordinateSystem,
    ) -> Result<[u8; HEADER_LEN], Error> {
        let count = Varint::encode_count(body_len, system)?;
        if count.len() > COUNT_LEN {
            return Err(Error::CountTooLarge(body_len));
        }

        let mut header = [0u8; HEADER_LEN];
        header[..count.len()].copy_from_slice(&count);
        header[MARKER_INDEX] = MARKER;
        header[DIMENSION_INDEX] = dimension as u8;
        Ok(header)
    }

    /// Reads the dimension flag of a payload.
    ///
    /// ## Errors
    /// - `PayloadTooShort` when the payload cannot hold a header
    /// - `UnsupportedDimension` when the flag is outside 0..=3
    pub fn decode(payload: &[u8]) -> Result<Dimension, Error> {
        if payload.len() < HEADER_LEN {
            return Err(Error::PayloadTooShort(payload.len()));
        }
        Dimension::try_from(payload[DIMENSION_INDEX])
    }

    /// Decodes the body length recorded in the header.
    pub fn body_len(payload: &[u8], system: &CoordinateSystem) -> Result<usize, Error> {
        if payload.len() < HEADER_LEN {
            return Err(Error::PayloadTooShort(payload.len()));
        }
        let (count, _) = Varint::decode_count(&payload[..COUNT_LEN], system)?;
        usize::try_from(count).map_err(|_| Error::CountTooLarge(usize::MAX))
    }

    /// Returns the body that follows the header.
    pub fn body(payload: &[u8]) -> Result<&[u8], Error> {
        payload
            .get(HEADER_LEN..)
            .ok_or(Error::PayloadTooShort(payload.len()))
    }
}
