//! Named thermodynamic quantities flowing through the derivation stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical quantity produced or consumed by a derivation stage
///
/// The discriminant doubles as the slot index in a stage plan's per-point
/// state, so variants must stay dense and `COUNT` must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Absolute temperature (K)
    Temperature = 0,
    /// Specific humidity (kg/kg)
    SpecificHumidity = 1,
    /// Air pressure (mbar)
    Pressure = 2,
    /// Saturation vapor pressure (mbar)
    SaturationVaporPressure = 3,
    /// Saturation mixing ratio (g/kg)
    SaturationMixingRatio = 4,
    /// Relative humidity (%)
    RelativeHumidity = 5,
    /// Mixing ratio (g/kg)
    MixingRatio = 6,
    /// Lifting condensation temperature (K)
    LiftingCondensationTemperature = 7,
    /// Potential temperature equivalent of the lifting condensation temperature (K)
    EquivalentPotentialTemperature = 8,
    /// Wet-bulb temperature (°C)
    WetBulbTemperature = 9,
}

impl Quantity {
    /// Number of distinct quantities
    pub const COUNT: usize = 10;

    /// Every quantity in slot order
    pub const ALL: [Quantity; Self::COUNT] = [
        Quantity::Temperature,
        Quantity::SpecificHumidity,
        Quantity::Pressure,
        Quantity::SaturationVaporPressure,
        Quantity::SaturationMixingRatio,
        Quantity::RelativeHumidity,
        Quantity::MixingRatio,
        Quantity::LiftingCondensationTemperature,
        Quantity::EquivalentPotentialTemperature,
        Quantity::WetBulbTemperature,
    ];

    /// Slot index in a per-point state array
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Conventional short variable name (`tref`, `sh`, `wbt`, ...)
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Temperature => "tref",
            Self::SpecificHumidity => "sh",
            Self::Pressure => "p",
            Self::SaturationVaporPressure => "esat",
            Self::SaturationMixingRatio => "wsat",
            Self::RelativeHumidity => "rh",
            Self::MixingRatio => "w",
            Self::LiftingCondensationTemperature => "tl",
            Self::EquivalentPotentialTemperature => "theta",
            Self::WetBulbTemperature => "wbt",
        }
    }

    /// Unit string attached to labeled outputs
    pub const fn units(self) -> &'static str {
        match self {
            Self::Temperature
            | Self::LiftingCondensationTemperature
            | Self::EquivalentPotentialTemperature => "K",
            Self::SpecificHumidity => "kg/kg",
            Self::Pressure | Self::SaturationVaporPressure => "mbar",
            Self::SaturationMixingRatio | Self::MixingRatio => "g/kg",
            Self::RelativeHumidity => "%",
            Self::WetBulbTemperature => "degC",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_indices_are_dense() {
        for (i, q) in Quantity::ALL.iter().enumerate() {
            assert_eq!(q.index(), i, "{q} out of order");
        }
    }

    #[test]
    fn test_units() {
        assert_eq!(Quantity::WetBulbTemperature.units(), "degC");
        assert_eq!(Quantity::Temperature.units(), "K");
        assert_eq!(Quantity::RelativeHumidity.units(), "%");
        assert_eq!(Quantity::SaturationMixingRatio.to_string(), "wsat");
    }
}
