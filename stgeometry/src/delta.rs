//! Difference runs between consecutive coordinates of a multi-point
//! geometry.
//!
//! A difference is stored through the same absolute encoding as any other
//! value, anchored at the axis origin: the run of `origin + (current -
//! previous)`. Small steps between neighbouring points therefore produce
//! short runs whatever the absolute position of the points.

use crate::coordinates::Axis;
use crate::coordinates::CoordinateSystem;
use crate::error::Error;
use crate::varint::Varint;

/// Encoding and decoding of difference runs.
#[derive(Debug, Clone)]
pub struct Delta;

impl Delta {
    /// Derives the difference run of `current` relative to `previous`,
    /// both given as absolute runs.
    pub fn encode_difference(
        current: &[u8],
        previous: &[u8],
        axis: Axis,
        system: &CoordinateSystem,
    ) -> Result<Vec<u8>, Error> {
        let origin = system.min(axis)?;
        let current = Varint::decode(current, axis, system)?;
        let previous = Varint::decode(previous, axis, system)?;

        let anchored = current
            .checked_sub(previous)
            .and_then(|difference| origin.checked_add(difference))
            .ok_or(Error::ArithmeticOverflow("coordinate difference"))?;

        Varint::encode(anchored, axis, system)
    }

    /// Rebuilds the absolute run of a coordinate from the absolute run of
    /// the previous coordinate and the difference run between them.
    pub fn decode_difference(
        difference: &[u8],
        previous: &[u8],
        axis: Axis,
        system: &CoordinateSystem,
    ) -> Result<Vec<u8>, Error> {
        let origin = system.min(axis)?;
        let difference = Varint::decode(difference, axis, system)?;
        let previous = Varint::decode(previous, axis, system)?;

        let absolute = previous
            .checked_sub(origin)
            .and_then(|offset| offset.checked_add(difference))
            .ok_or(Error::ArithmeticOverflow("coordinate from its difference"))?;

        Varint::encode(absolute, axis, system)
    }
}
