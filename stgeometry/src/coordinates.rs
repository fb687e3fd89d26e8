//! # Coordinate System
//!
//! The coordinate system describes the encoding space every geometry is
//! written into: a resolution, an origin (minimum) per axis and the byte
//! radii that turn an offset from the origin into a variable-length run.
//!
//! It has to match the configuration of the feature class that produced
//! the payloads, otherwise every decoded value is wrong. The encoding of
//! each axis minimum is always the single byte `{0}`.
//!
//! A `CoordinateSystem` is immutable once built and is passed explicitly to
//! every codec and geometry operation, so several systems can coexist in
//! one process.

use rust_decimal::Decimal;

use crate::error::Error;

/// Default per-level byte radii: one level-1 byte is worth 64 level-0
/// bytes, every following level is worth 128 of the previous one.
pub const DEFAULT_BYTE_RADII: [u8; 9] = [1, 64, 128, 128, 128, 128, 128, 128, 128];

/// Default value added to every non-terminal byte of a run.
pub const DEFAULT_RESTART_MARKER: u8 = 128;

/// Bytes at or above this value continue the current run.
pub const CONTINUATION_THRESHOLD: u8 = 128;

/// The ordinate an encoded value belongs to. Each axis has its own
/// origin, so the same value encodes differently per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Easting
    X,
    /// Northing
    Y,
    /// Elevation
    Z,
    /// Measure
    M,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::M => "M",
        };
        f.write_str(name)
    }
}

/// An immutable description of the encoding space.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSystem {
    srid: i32,
    srid_name: Option<String>,
    resolution: Decimal,
    tolerance: Decimal,
    min_x: Decimal,
    max_x: Decimal,
    min_y: Decimal,
    max_y: Decimal,
    min_z: Option<Decimal>,
    max_z: Decimal,
    byte_radii: Vec<u8>,
    byte_scales: Vec<Decimal>,
    count_scales: Vec<u64>,
    restart_marker: u8,
}

impl CoordinateSystem {
    /// Starts building a coordinate system from its mandatory settings.
    pub fn builder(
        srid: i32,
        resolution: Decimal,
        min_x: Decimal,
        min_y: Decimal,
    ) -> CoordinateSystemBuilder {
        CoordinateSystemBuilder {
            srid,
            srid_name: None,
            resolution,
            tolerance: None,
            min_x,
            max_x: None,
            min_y,
            max_y: None,
            min_z: None,
            max_z: None,
            byte_radii: None,
            restart_marker: None,
        }
    }

    /// Coordinate system identifier. Informational only.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// Coordinate system name. Informational only.
    pub fn srid_name(&self) -> Option<&str> {
        self.srid_name.as_deref()
    }

    /// Smallest representable unit along any axis.
    pub fn resolution(&self) -> Decimal {
        self.resolution
    }

    /// Distance under which two values are considered equal.
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Whether a Z origin was configured.
    pub fn has_z(&self) -> bool {
        self.min_z.is_some()
    }

    /// Returns the origin of the given axis.
    ///
    /// ## Errors
    /// - `ZAxisNotConfigured` for Z when no minimum Z was configured
    /// - `MeasureNotSupported` for M
    pub fn min(&self, axis: Axis) -> Result<Decimal, Error> {
        match axis {
            Axis::X => Ok(self.min_x),
            Axis::Y => Ok(self.min_y),
            Axis::Z => self.min_z.ok_or(Error::ZAxisNotConfigured),
            Axis::M => Err(Error::MeasureNotSupported),
        }
    }

    /// Returns the configured maximum of the given axis.
    pub fn max(&self, axis: Axis) -> Result<Decimal, Error> {
        match axis {
            Axis::X => Ok(self.max_x),
            Axis::Y => Ok(self.max_y),
            Axis::Z if self.has_z() => Ok(self.max_z),
            Axis::Z => Err(Error::ZAxisNotConfigured),
            Axis::M => Err(Error::MeasureNotSupported),
        }
    }

    /// Per-level multipliers.
    pub fn byte_radii(&self) -> &[u8] {
        &self.byte_radii
    }

    /// Real-world magnitude of one unit at each byte level.
    pub fn byte_scales(&self) -> &[Decimal] {
        &self.byte_scales
    }

    /// Magnitude of one unit at each byte level when counting plain
    /// integers (the byte scales divided by the resolution).
    pub fn count_scales(&self) -> &[u64] {
        &self.count_scales
    }

    /// Value added to non-terminal bytes.
    pub fn restart_marker(&self) -> u8 {
        self.restart_marker
    }

    /// The radius of level 1, which doubles as the sign flag of the
    /// leading byte.
    pub(crate) fn sign_flag(&self) -> u8 {
        // `build` rejects fewer than two radii.
        self.byte_radii[1]
    }
}

/// Builder for [`CoordinateSystem`]. Every optional setting falls back to
/// the default of the format.
#[derive(Debug, Clone)]
pub struct CoordinateSystemBuilder {
    srid: i32,
    srid_name: Option<String>,
    resolution: Decimal,
    tolerance: Option<Decimal>,
    min_x: Decimal,
    max_x: Option<Decimal>,
    min_y: Decimal,
    max_y: Option<Decimal>,
    min_z: Option<Decimal>,
    max_z: Option<Decimal>,
    byte_radii: Option<Vec<u8>>,
    restart_marker: Option<u8>,
}

impl CoordinateSystemBuilder {
    /// Sets the informational name.
    pub fn srid_name(mut self, name: impl Into<String>) -> Self {
        self.srid_name = Some(name.into());
        self
    }

    /// Sets the tolerance. Defaults to ten times the resolution.
    pub fn tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Sets the maximum X value.
    pub fn max_x(mut self, max: Decimal) -> Self {
        self.max_x = Some(max);
        self
    }

    /// Sets the maximum Y value.
    pub fn max_y(mut self, max: Decimal) -> Self {
        self.max_y = Some(max);
        self
    }

    /// Sets the Z origin, enabling Z support.
    pub fn min_z(mut self, min: Decimal) -> Self {
        self.min_z = Some(min);
        self
    }

    /// Sets the maximum Z value.
    pub fn max_z(mut self, max: Decimal) -> Self {
        self.max_z = Some(max);
        self
    }

    /// Replaces the default byte radii.
    pub fn byte_radii(mut self, radii: impl Into<Vec<u8>>) -> Self {
        self.byte_radii = Some(radii.into());
        self
    }

    /// Replaces the default restart marker.
    pub fn restart_marker(mut self, marker: u8) -> Self {
        self.restart_marker = Some(marker);
        self
    }

    /// Validates the settings and derives the byte scales.
    pub fn build(self) -> Result<CoordinateSystem, Error> {
        if self.resolution <= Decimal::ZERO {
            return Err(Error::InvalidResolution(self.resolution));
        }

        let byte_radii = self
            .byte_radii
            .unwrap_or_else(|| DEFAULT_BYTE_RADII.to_vec());
        if byte_radii.len() < 2 {
            return Err(Error::InvalidByteRadii("at least two levels are required"));
        }
        if byte_radii[1..].iter().any(|&radius| radius < 2) {
            return Err(Error::InvalidByteRadii(
                "every radius after the first must be at least 2",
            ));
        }

        let restart_marker = self.restart_marker.unwrap_or(DEFAULT_RESTART_MARKER);
        let highest_flagged = restart_marker as u16 + 2 * byte_radii[1] as u16 - 1;
        if restart_marker < CONTINUATION_THRESHOLD || highest_flagged > u8::MAX as u16 {
            return Err(Error::InvalidRestartMarker(restart_marker));
        }

        let mut byte_scales = Vec::with_capacity(byte_radii.len());
        let mut count_scales = Vec::with_capacity(byte_radii.len());
        byte_scales.push(self.resolution);
        count_scales.push(1u64);
        for (level, &radius) in byte_radii.iter().enumerate().skip(1) {
            let scale = byte_scales[level - 1]
                .checked_mul(Decimal::from(radius))
                .ok_or(Error::ByteScaleOverflow(level))?;
            let count = count_scales[level - 1]
                .checked_mul(radius as u64)
                .ok_or(Error::ByteScaleOverflow(level))?;
            byte_scales.push(scale);
            count_scales.push(count);
        }

        let max_x = self.max_x.unwrap_or(Decimal::MAX);
        let max_y = self.max_y.unwrap_or(Decimal::MAX);
        let max_z = self.max_z.unwrap_or(Decimal::MAX);
        check_range(Axis::X, self.min_x, max_x)?;
        check_range(Axis::Y, self.min_y, max_y)?;
        if let Some(min_z) = self.min_z {
            check_range(Axis::Z, min_z, max_z)?;
        }

        let default_tolerance = self
            .resolution
            .checked_mul(Decimal::TEN)
            .ok_or(Error::ArithmeticOverflow("tolerance"))?;
        let tolerance = self.tolerance.unwrap_or(default_tolerance);
        if tolerance < self.resolution {
            tracing::warn!(
                %tolerance,
                resolution = %self.resolution,
                "the tolerance is smaller than the resolution"
            );
        }

        tracing::debug!(
            srid = self.srid,
            resolution = %self.resolution,
            levels = byte_radii.len(),
            has_z = self.min_z.is_some(),
            "built coordinate system"
        );

        Ok(CoordinateSystem {
            srid: self.srid,
            srid_name: self.srid_name,
            resolution: self.resolution,
            tolerance,
            min_x: self.min_x,
            max_x,
            min_y: self.min_y,
            max_y,
            min_z: self.min_z,
            max_z,
            byte_radii,
            byte_scales,
            count_scales,
            restart_marker,
        })
    }
}

fn check_range(axis: Axis, min: Decimal, max: Decimal) -> Result<(), Error> {
    if max < min {
        return Err(Error::EmptyAxisRange { axis, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use more_asserts::assert_lt;
    use test_case::test_case;

    fn system() -> CoordinateSystem {
        CoordinateSystem::builder(
            3857,
            Decimal::new(1, 4),
            Decimal::from(-20037700),
            Decimal::from(-30241100),
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cs = system();

        assert_eq!(cs.tolerance(), Decimal::new(1, 3));
        assert_eq!(cs.byte_radii(), &DEFAULT_BYTE_RADII);
        assert_eq!(cs.restart_marker(), 128);
        assert_eq!(cs.max(Axis::X).unwrap(), Decimal::MAX);
        assert!(!cs.has_z());
        assert_eq!(cs.srid_name(), None);
    }

    #[test]
    fn test_byte_scales_strictly_increase() {
        let cs = system();
        let scales = cs.byte_scales();

        assert_eq!(scales[0], cs.resolution());
        assert_eq!(scales[1], Decimal::new(64, 4));
        assert_eq!(scales[2], Decimal::new(8192, 4));
        for pair in scales.windows(2) {
            assert_lt!(pair[0], pair[1]);
        }
        assert_eq!(&cs.count_scales()[..4], &[1u64, 64, 8192, 1_048_576]);
    }

    #[test_case(Axis::X => Ok(Decimal::from(-20037700)); "x")]
    #[test_case(Axis::Y => Ok(Decimal::from(-30241100)); "y")]
    #[test_case(Axis::Z => Err(Error::ZAxisNotConfigured); "z without origin")]
    #[test_case(Axis::M => Err(Error::MeasureNotSupported); "m")]
    fn test_min(axis: Axis) -> Result<Decimal, Error> {
        system().min(axis)
    }

    #[test]
    fn test_z_origin_enables_z() {
        let cs = CoordinateSystem::builder(1, Decimal::ONE, Decimal::ZERO, Decimal::ZERO)
            .min_z(Decimal::from(-100000))
            .build()
            .unwrap();

        assert!(cs.has_z());
        assert_eq!(cs.min(Axis::Z).unwrap(), Decimal::from(-100000));
        assert_eq!(cs.max(Axis::Z).unwrap(), Decimal::MAX);
    }

    #[test]
    fn test_tolerance_below_resolution_is_accepted() {
        let cs = CoordinateSystem::builder(1, Decimal::ONE, Decimal::ZERO, Decimal::ZERO)
            .tolerance(Decimal::new(5, 1))
            .build()
            .unwrap();

        assert_eq!(cs.tolerance(), Decimal::new(5, 1));
        assert_lt!(cs.tolerance(), cs.resolution());
    }

    #[test_case(Decimal::ZERO; "zero")]
    #[test_case(Decimal::NEGATIVE_ONE; "negative")]
    fn test_invalid_resolution(resolution: Decimal) {
        let result = CoordinateSystem::builder(1, resolution, Decimal::ZERO, Decimal::ZERO).build();
        assert_matches!(result, Err(Error::InvalidResolution(r)) if r == resolution);
    }

    #[test_case(vec![1]; "single level")]
    #[test_case(vec![1, 64, 1]; "flat level")]
    #[test_case(vec![1, 0, 128]; "zero radius")]
    fn test_invalid_radii(radii: Vec<u8>) {
        let result = CoordinateSystem::builder(1, Decimal::ONE, Decimal::ZERO, Decimal::ZERO)
            .byte_radii(radii)
            .build();
        assert_matches!(result, Err(Error::InvalidByteRadii(_)));
    }

    #[test_case(64; "below continuation threshold")]
    #[test_case(129; "sign flag overflows")]
    fn test_invalid_restart_marker(marker: u8) {
        let result = CoordinateSystem::builder(1, Decimal::ONE, Decimal::ZERO, Decimal::ZERO)
            .restart_marker(marker)
            .build();
        assert_matches!(result, Err(Error::InvalidRestartMarker(m)) if m == marker);
    }

    #[test]
    fn test_empty_axis_range() {
        let result = CoordinateSystem::builder(1, Decimal::ONE, Decimal::TEN, Decimal::ZERO)
            .max_x(Decimal::ONE)
            .build();
        assert_matches!(result, Err(Error::EmptyAxisRange { axis: Axis::X, .. }));
    }

    #[test]
    fn test_scale_overflow() {
        let result = CoordinateSystem::builder(1, Decimal::MAX, Decimal::ZERO, Decimal::ZERO).build();
        assert_matches!(result, Err(Error::ByteScaleOverflow(1)));
    }
}
