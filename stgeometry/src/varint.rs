//! # Mixed-Radix Variable-Length Values
//!
//! Every ordinate is stored as its offset from the axis origin, split into
//! one byte per level of the coordinate system's byte scales.
//!
//! ## Encoding Format
//!
//! Bytes are written in ascending significance: index 0 holds level 0 (the
//! resolution), the last byte holds the most significant level. Every byte
//! except the last carries the restart marker (128), so a reader knows a
//! run ends at the first byte below 128.
//!
//! The sign of the offset lives in the least significant byte: the level-1
//! radius (64) is added on top of its value. A single-byte run is therefore
//! negative when its byte is at least 64, a multi-byte run when its first
//! byte is at least 64 + 128.
//!
//! For example, with a resolution of 0.0001 and an origin of -100000,
//! `-99999` (offset 10000 units) encodes as `[144, 156, 1]`:
//! - 144 = 128 + 16: restart marker, 16 x 1 unit
//! - 156 = 128 + 28: restart marker, 28 x 64 units
//! - 1: final byte, 1 x 8192 units
//!
//! and `-100001` encodes as `[208, 156, 1]`, the same run with 64 added to
//! the first byte.
//!
//! Digits below the resolution are dropped. An offset that truncates to zero
//! always encodes as `[0]`, never as a flagged `[64]`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::coordinates::Axis;
use crate::coordinates::CoordinateSystem;
use crate::coordinates::CONTINUATION_THRESHOLD;
use crate::error::Error;

/// Utility for encoding and decoding single values against a coordinate
/// system.
#[derive(Debug, Clone)]
pub struct Varint;

impl Varint {
    /// Encodes an ordinate into its byte run.
    ///
    /// ## Errors
    /// - `MeasureNotSupported` for the M axis
    /// - `ZAxisNotConfigured` for Z on a planar coordinate system
    /// - `ByteOverflow` when a byte would leave its range
    /// - `RunTooLong` when the value needs every available level
    pub fn encode(value: Decimal, axis: Axis, system: &CoordinateSystem) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();
        Self::encode_into(value, axis, system, &mut bytes)?;
        Ok(bytes)
    }

    /// Encodes an ordinate, appending its run to the provided buffer. The
    /// buffer is left untouched on error.
    pub fn encode_into(
        value: Decimal,
        axis: Axis,
        system: &CoordinateSystem,
        bytes: &mut Vec<u8>,
    ) -> Result<(), Error> {
        let origin = system.min(axis)?;
        let overflow = || Error::ByteOverflow { axis, value };

        let offset = value
            .checked_sub(origin)
            .ok_or(Error::ArithmeticOverflow("offset from the axis origin"))?;
        let negative = offset < Decimal::ZERO;
        let offset = offset.abs();

        let scales = system.byte_scales();
        let mut level = scales.len() - 1;
        while level > 0 && offset < scales[level] {
            level -= 1;
        }

        // Decoding looks one radius past the last byte, so the top level
        // can never be used.
        if level + 1 >= system.byte_radii().len() {
            return Err(Error::RunTooLong(level + 1));
        }

        let mut run = vec![0u8; level + 1];
        let mut remainder = offset;
        for current in (0..=level).rev() {
            let scale = scales[current];
            let mut digit = remainder.checked_div(scale).ok_or_else(overflow)?.floor();
            // Division rounds at 28 significant digits.
            if digit * scale > remainder {
                digit -= Decimal::ONE;
            }
            remainder -= digit * scale;

            let mut byte = digit.to_u16().ok_or_else(overflow)?;
            if current < level {
                byte += system.restart_marker() as u16;
            }
            run[current] = u8::try_from(byte).map_err(|_| overflow())?;
        }

        if run[level] >= CONTINUATION_THRESHOLD {
            return Err(overflow());
        }

        // An offset below the origin by less than one resolution unit is
        // the origin itself, and the origin has a single encoding.
        let negative = negative && run != [0];
        if negative {
            set_negative(&mut run, system).ok_or_else(overflow)?;
        }

        tracing::trace!(%value, %axis, ?run, "encoded value");
        bytes.extend_from_slice(&run);
        Ok(())
    }

    /// Decodes a single byte run back into an ordinate.
    ///
    /// ## Errors
    /// - `MeasureNotSupported` for the M axis
    /// - `ZAxisNotConfigured` for Z on a planar coordinate system
    /// - `EmptyRun` for an empty input
    /// - `RunTooLong` when the run has more bytes than levels to read
    /// - `InvalidLeadingByte` when a multi-byte run starts below the
    ///   restart marker
    pub fn decode(bytes: &[u8], axis: Axis, system: &CoordinateSystem) -> Result<Decimal, Error> {
        let origin = system.min(axis)?;
        let radii = system.byte_radii();

        if bytes.is_empty() {
            return Err(Error::EmptyRun);
        }
        if bytes.len() >= radii.len() {
            return Err(Error::RunTooLong(bytes.len()));
        }

        let (negative, lead) = split_sign(bytes, system)?;

        let scales = system.byte_scales();
        let overflow = || Error::ArithmeticOverflow("decoded value");
        let mut magnitude = Decimal::from(lead)
            .checked_mul(scales[0])
            .ok_or_else(overflow)?;

        for (level, &byte) in bytes.iter().enumerate().skip(1) {
            // Compared against the radius of the next level, not the
            // restart marker. With the default radii both are 128.
            let byte = if byte >= radii[level + 1] {
                byte.wrapping_sub(system.restart_marker())
            } else {
                byte
            };
            magnitude = Decimal::from(byte)
                .checked_mul(scales[level])
                .and_then(|part| magnitude.checked_add(part))
                .ok_or_else(overflow)?;
        }

        let value = if negative {
            origin.checked_sub(magnitude)
        } else {
            origin.checked_add(magnitude)
        };
        value.ok_or_else(overflow)
    }

    /// Encodes a non-negative count, with no origin and no sign. Used for
    /// the body size of the geometry header.
    pub fn encode_count(count: usize, system: &CoordinateSystem) -> Result<Vec<u8>, Error> {
        let scales = system.count_scales();
        let value = count as u64;

        let mut level = scales.len() - 1;
        while level > 0 && value < scales[level] {
            level -= 1;
        }

        let mut run = vec![0u8; level + 1];
        let mut remainder = value;
        for current in (0..=level).rev() {
            let digit = remainder / scales[current];
            remainder -= digit * scales[current];

            let mut byte = digit;
            if current < level {
                byte += system.restart_marker() as u64;
            }
            run[current] = u8::try_from(byte).map_err(|_| Error::CountTooLarge(count))?;
        }

        if run[level] >= CONTINUATION_THRESHOLD {
            return Err(Error::CountTooLarge(count));
        }

        Ok(run)
    }

    /// Decodes a count written by [`Varint::encode_count`] from the start
    /// of `bytes`.
    ///
    /// ## Returns
    /// * `Ok((count, bytes_read))` - The decoded count and consumed bytes
    pub fn decode_count(bytes: &[u8], system: &CoordinateSystem) -> Result<(u64, usize), Error> {
        if bytes.is_empty() {
            return Err(Error::EmptyRun);
        }

        let scales = system.count_scales();
        let mut count: u64 = 0;

        for (level, &byte) in bytes.iter().enumerate() {
            let scale = *scales.get(level).ok_or(Error::RunTooLong(level + 1))?;
            let terminal = byte < CONTINUATION_THRESHOLD;
            let digit = if terminal {
                byte
            } else {
                byte.checked_sub(system.restart_marker())
                    .ok_or(Error::InvalidLeadingByte(byte))?
            };

            count = (digit as u64)
                .checked_mul(scale)
                .and_then(|part| count.checked_add(part))
                .ok_or(Error::ArithmeticOverflow("decoded count"))?;

            if terminal {
                return Ok((count, level + 1));
            }
        }

        Err(Error::IncompleteRun)
    }
}

/// Flags a freshly encoded run as negative. Returns `None` when the leading
/// byte has no room for the flag.
fn set_negative(run: &mut [u8], system: &CoordinateSystem) -> Option<()> {
    let flag = system.sign_flag();
    let restart = system.restart_marker();
    let lead = run[0];

    let representable = if run.len() == 1 {
        lead < flag
    } else {
        lead >= restart && lead - restart < flag
    };
    if !representable {
        return None;
    }

    run[0] = lead.checked_add(flag)?;
    Some(())
}

/// Reads the sign off the leading byte and returns it with the level-0
/// digit.
fn split_sign(bytes: &[u8], system: &CoordinateSystem) -> Result<(bool, u8), Error> {
    let flag = system.sign_flag();
    let restart = system.restart_marker();
    let lead = bytes[0];

    if bytes.len() == 1 {
        return Ok(match lead.checked_sub(flag) {
            Some(digit) => (true, digit),
            None => (false, lead),
        });
    }

    let negative_threshold = flag as u16 + restart as u16;
    if lead as u16 >= negative_threshold {
        return Ok((true, lead - flag - restart));
    }

    lead.checked_sub(restart)
        .map(|digit| (false, digit))
        .ok_or(Error::InvalidLeadingByte(lead))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::testing::web_mercator;
    use proptest::prelude::*;

    /// The distance from origin to maximum of the Web Mercator system in
    /// resolution units. It is the same on every axis.
    const MAX_UNITS: i64 = 9_007_199_254_740_990;

    proptest! {
        #[test]
        fn test_sign_symmetry(units in 0..=MAX_UNITS, axis in prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z)]) {
            let cs = web_mercator();
            let origin = cs.min(axis).unwrap();
            let delta = Decimal::new(units, 4);

            for value in [origin + delta, origin - delta] {
                let bytes = Varint::encode(value, axis, &cs).unwrap();
                prop_assert_eq!(Varint::decode(&bytes, axis, &cs).unwrap(), value);

                // Every byte but the last continues the run.
                let (last, rest) = bytes.split_last().unwrap();
                prop_assert!(*last < CONTINUATION_THRESHOLD);
                prop_assert!(rest.iter().all(|&b| b >= CONTINUATION_THRESHOLD));
            }
        }

        #[test]
        fn test_count_round_trip(count in 0usize..100_000_000) {
            let cs = web_mercator();
            let bytes = Varint::encode_count(count, &cs).unwrap();
            let (decoded, read) = Varint::decode_count(&bytes, &cs).unwrap();

            prop_assert_eq!(decoded, count as u64);
            prop_assert_eq!(read, bytes.len());
        }
    }
}
