//! A single ordinate paired with its encoded run.

use rust_decimal::Decimal;

use crate::coordinates::Axis;
use crate::coordinates::CoordinateSystem;
use crate::error::Error;
use crate::geometry::text::format_ordinate;
use crate::varint::Varint;

/// An ordinate value tagged with its axis, together with its canonical
/// byte run in the coordinate system it was built against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    axis: Axis,
    value: Decimal,
    bytes: Vec<u8>,
}

impl Coordinate {
    /// Encodes a value.
    pub fn from_value(value: Decimal, axis: Axis, system: &CoordinateSystem) -> Result<Self, Error> {
        let bytes = Varint::encode(value, axis, system)?;
        // Keep the value as stored, not as given: anything below the
        // resolution is dropped by the encoding.
        let value = Varint::decode(&bytes, axis, system)?;
        Ok(Self { axis, value, bytes })
    }

    /// Decodes a byte run.
    pub fn from_bytes(bytes: &[u8], axis: Axis, system: &CoordinateSystem) -> Result<Self, Error> {
        let value = Varint::decode(bytes, axis, system)?;
        Ok(Self { axis, value, bytes: bytes.to_vec() })
    }

    /// The axis of the ordinate.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The decoded value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// The encoded run.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_ordinate(self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dec, web_mercator};
    use assert_matches::assert_matches;

    #[test]
    fn test_from_value() {
        let cs = web_mercator();
        let coordinate = Coordinate::from_value(dec("-99999"), Axis::Z, &cs).unwrap();

        assert_eq!(coordinate.axis(), Axis::Z);
        assert_eq!(coordinate.value(), dec("-99999"));
        assert_eq!(coordinate.bytes(), &[144, 156, 1]);
        assert_eq!(coordinate.to_string(), "-99999");
    }

    #[test]
    fn test_from_value_keeps_stored_value() {
        let cs = web_mercator();
        let coordinate = Coordinate::from_value(dec("0.00019"), Axis::X, &cs).unwrap();

        assert_eq!(coordinate.value(), dec("0.0001"));
        assert_eq!(coordinate, Coordinate::from_bytes(coordinate.bytes(), Axis::X, &cs).unwrap());
    }

    #[test]
    fn test_measure_unsupported() {
        let cs = web_mercator();

        assert_matches!(
            Coordinate::from_value(Decimal::ZERO, Axis::M, &cs),
            Err(Error::MeasureNotSupported)
        );
        assert_matches!(
            Coordinate::from_bytes(&[0], Axis::M, &cs),
            Err(Error::MeasureNotSupported)
        );
    }
}
