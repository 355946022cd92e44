//! Settings that are written to the mouse driver.
//!
//! Everything here is compiled in. The acceleration factor may be overridden
//! from the command line, but the scaling table can only be changed by editing
//! [`DEFAULT_SCALE_LEVELS`] and rebuilding.

use serde::Serialize;
use std::fmt;

use crate::error::MouseFixError;

/// Maximum number of entries the driver accepts in a scaling table (`NX_MAXMOUSESCALINGS`).
pub const MAX_SCALE_LEVELS: usize = 20;

/// Acceleration factor used when none is given on the command line.
pub const DEFAULT_ACCELERATION: f64 = 2.0;

/// The scaling curve as (threshold, multiplier) pairs.
///
/// Moving the mouse by `threshold` units moves the cursor by `threshold * multiplier` pixels.
/// Thresholds must be strictly increasing. If the first threshold is not 1 the driver may
/// insert a `{1, 1}` entry on its own, that behaviour is not documented.
///
/// Derived from the Windows XP mouse curve, best used with an acceleration factor of 2.
/// The driver only takes integers so the fractional parts of that curve are dropped.
pub const DEFAULT_SCALE_LEVELS: [(u16, u16); 5] = [
    (1, 1),
    (40, 6),    // 40.18, 6.59
    (123, 4),   // 123.48, 4.04
    (377, 6),   // 377.30, 6.31
    (3920, 14), // 3920, 14.15
];

/// A positive, finite acceleration factor.
///
/// With a scaling table it controls how eagerly the driver moves up the table,
/// without one it acts as a plain linear multiplier.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct AccelerationFactor(f64);

impl AccelerationFactor {
    pub fn new(factor: f64) -> Result<Self, MouseFixError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(MouseFixError::InvalidAcceleration(factor))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for AccelerationFactor {
    fn default() -> Self {
        Self(DEFAULT_ACCELERATION)
    }
}

impl fmt::Display for AccelerationFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// One entry of the scaling table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScaleLevel {
    pub threshold: u16,
    pub multiplier: u16,
}

impl From<(u16, u16)> for ScaleLevel {
    fn from((threshold, multiplier): (u16, u16)) -> Self {
        Self {
            threshold,
            multiplier,
        }
    }
}

/// Ordered scaling table. An empty table disables non-linear scaling in the driver.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ScalingTable(Vec<ScaleLevel>);

impl ScalingTable {
    pub fn new(levels: impl IntoIterator<Item = (u16, u16)>) -> Self {
        Self(levels.into_iter().map(ScaleLevel::from).collect())
    }

    /// The table selected at build time through the `scaling-table` feature.
    pub fn compiled() -> Self {
        if cfg!(feature = "scaling-table") {
            Self::new(DEFAULT_SCALE_LEVELS)
        } else {
            Self::disabled()
        }
    }

    /// A table that clears any scaling curve the driver currently uses.
    pub fn disabled() -> Self {
        Self(Vec::new())
    }

    pub fn levels(&self) -> &[ScaleLevel] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that the driver can take this table.
    /// The size is checked first so that an oversized table is always reported as such.
    pub fn validate(&self) -> Result<(), MouseFixError> {
        if self.len() > MAX_SCALE_LEVELS {
            return Err(MouseFixError::too_many_scale_levels(self.len()));
        }

        // The driver stores both columns as signed shorts.
        let limit = i16::MAX.unsigned_abs();
        for (index, level) in self.0.iter().enumerate() {
            if index > 0 && level.threshold <= self.0[index - 1].threshold {
                return Err(MouseFixError::UnorderedThresholds { index });
            }
            if level.threshold > limit || level.multiplier > limit {
                return Err(MouseFixError::ScaleLevelOutOfRange { index });
            }
        }

        Ok(())
    }
}

impl fmt::Display for ScalingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(disabled)");
        }
        for (i, level) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{{{}, {}}}", level.threshold, level.multiplier)?;
        }
        Ok(())
    }
}

/// Everything a run writes to the driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub acceleration: AccelerationFactor,
    pub scaling: ScalingTable,
}

impl Settings {
    /// Settings built only from compiled-in defaults.
    pub fn compiled() -> Self {
        Self {
            acceleration: AccelerationFactor::default(),
            scaling: ScalingTable::compiled(),
        }
    }

    pub fn with_acceleration(mut self, acceleration: AccelerationFactor) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_scaling(mut self, scaling: ScalingTable) -> Self {
        self.scaling = scaling;
        self
    }

    /// Serialize settings in TOML format.
    pub fn to_toml_string(&self) -> Result<String, MouseFixError> {
        Ok(toml::to_string_pretty(&self)?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::compiled()
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Acceleration factor: {}.\n\
            Scaling table: {}.",
            self.acceleration, self.scaling,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceleration_rejects_non_positive() {
        assert!(matches!(
            AccelerationFactor::new(0.0),
            Err(MouseFixError::InvalidAcceleration(_))
        ));
        assert!(AccelerationFactor::new(-1.0).is_err());
        assert!(AccelerationFactor::new(f64::NAN).is_err());
        assert!(AccelerationFactor::new(f64::INFINITY).is_err());
        assert_eq!(4.5, AccelerationFactor::new(4.5).unwrap().value());
    }

    #[test]
    fn test_default_acceleration_display() {
        assert_eq!("2.00", AccelerationFactor::default().to_string());
    }

    #[test]
    fn test_compiled_table() {
        let table = ScalingTable::compiled();
        if cfg!(feature = "scaling-table") {
            assert_eq!(DEFAULT_SCALE_LEVELS.len(), table.len());
            assert_eq!(
                ScaleLevel {
                    threshold: 3920,
                    multiplier: 14
                },
                table.levels()[4]
            );
        } else {
            assert!(table.is_empty());
        }
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_too_many() {
        let table = ScalingTable::new((1..=21).map(|t| (t, 1)));

        assert!(matches!(
            table.validate(),
            Err(MouseFixError::TooManyScaleLevels { count: 21, max: 20 })
        ));
    }

    #[test]
    fn test_validate_max_is_accepted() {
        let table = ScalingTable::new((1..=20).map(|t| (t, 1)));

        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_unordered() {
        let table = ScalingTable::new([(1, 1), (40, 6), (40, 7)]);

        assert!(matches!(
            table.validate(),
            Err(MouseFixError::UnorderedThresholds { index: 2 })
        ));
    }

    #[test]
    fn test_validate_out_of_range() {
        let table = ScalingTable::new([(1, 1), (40_000, 2)]);

        assert!(matches!(
            table.validate(),
            Err(MouseFixError::ScaleLevelOutOfRange { index: 1 })
        ));
    }

    #[test]
    fn test_settings_toml() {
        let settings = Settings::compiled()
            .with_acceleration(AccelerationFactor::new(1.5).unwrap())
            .with_scaling(ScalingTable::new([(1, 1), (40, 6)]));
        let s = settings.to_toml_string().unwrap();

        assert!(s.contains("acceleration = 1.5"));
        assert!(s.contains("threshold = 40"));
        assert!(s.contains("multiplier = 6"));
    }

    #[test]
    fn test_display() {
        let settings = Settings::compiled().with_scaling(ScalingTable::new([(1, 1), (40, 6)]));

        assert_eq!(
            "Acceleration factor: 2.00.\nScaling table: {1, 1}, {40, 6}.",
            settings.to_string()
        );
    }
}
