//! Individual derivation stages
//!
//! A stage wraps one closed-form formula together with the quantities it
//! reads and the quantity it writes, so stages can be chained and checked
//! for missing inputs before any grid is touched.

use crate::core_types::{Quantity, Real};
use crate::physics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One closed-form transformation in a derivation chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// `tref → esat`
    SaturationVaporPressure,
    /// `(esat, p) → wsat`
    SaturationMixingRatio,
    /// `(sh, wsat) → rh`
    RelativeHumidity,
    /// `(wsat, rh) → w`
    MixingRatio,
    /// `sh → w`
    MixingRatioFromSpecificHumidity,
    /// `(tref, rh) → tl`
    LiftingCondensationTemperature,
    /// `(w, tref, tl, p) → theta`
    EquivalentPotentialTemperature,
    /// `theta → wbt` (Davies-Jones fit)
    WetBulbFromTheta,
    /// `(tref, rh) → wbt` (Stull regression)
    WetBulbStull,
}

impl Stage {
    /// Every stage, in declaration order
    pub const ALL: [Stage; 9] = [
        Stage::SaturationVaporPressure,
        Stage::SaturationMixingRatio,
        Stage::RelativeHumidity,
        Stage::MixingRatio,
        Stage::MixingRatioFromSpecificHumidity,
        Stage::LiftingCondensationTemperature,
        Stage::EquivalentPotentialTemperature,
        Stage::WetBulbFromTheta,
        Stage::WetBulbStull,
    ];

    /// Quantities read by this stage, in formula argument order
    pub const fn inputs(self) -> &'static [Quantity] {
        use Quantity as Q;
        match self {
            Self::SaturationVaporPressure => &[Q::Temperature],
            Self::SaturationMixingRatio => &[Q::SaturationVaporPressure, Q::Pressure],
            Self::RelativeHumidity => &[Q::SpecificHumidity, Q::SaturationMixingRatio],
            Self::MixingRatio => &[Q::SaturationMixingRatio, Q::RelativeHumidity],
            Self::MixingRatioFromSpecificHumidity => &[Q::SpecificHumidity],
            Self::LiftingCondensationTemperature | Self::WetBulbStull => {
                &[Q::Temperature, Q::RelativeHumidity]
            }
            Self::EquivalentPotentialTemperature => &[
                Q::MixingRatio,
                Q::Temperature,
                Q::LiftingCondensationTemperature,
                Q::Pressure,
            ],
            Self::WetBulbFromTheta => &[Q::EquivalentPotentialTemperature],
        }
    }

    /// Quantity written by this stage
    pub const fn output(self) -> Quantity {
        match self {
            Self::SaturationVaporPressure => Quantity::SaturationVaporPressure,
            Self::SaturationMixingRatio => Quantity::SaturationMixingRatio,
            Self::RelativeHumidity => Quantity::RelativeHumidity,
            Self::MixingRatio | Self::MixingRatioFromSpecificHumidity => Quantity::MixingRatio,
            Self::LiftingCondensationTemperature => Quantity::LiftingCondensationTemperature,
            Self::EquivalentPotentialTemperature => Quantity::EquivalentPotentialTemperature,
            Self::WetBulbFromTheta | Self::WetBulbStull => Quantity::WetBulbTemperature,
        }
    }

    /// Stable identifier used in logs and error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::SaturationVaporPressure => "esat",
            Self::SaturationMixingRatio => "wsat",
            Self::RelativeHumidity => "rh",
            Self::MixingRatio => "w",
            Self::MixingRatioFromSpecificHumidity => "w_from_sh",
            Self::LiftingCondensationTemperature => "tl",
            Self::EquivalentPotentialTemperature => "theta",
            Self::WetBulbFromTheta => "wbt_davies_jones",
            Self::WetBulbStull => "wbt_stull",
        }
    }

    /// Compute this stage's output from a per-point state
    ///
    /// `state` is indexed by [`Quantity::index`]. Slots the stage reads must
    /// already be populated; [`StagePlan`](super::StagePlan) validation
    /// guarantees that for every stage it runs.
    #[inline]
    pub fn compute<T: Real>(self, state: &[T; Quantity::COUNT]) -> T {
        use Quantity as Q;
        let v = |q: Quantity| state[q.index()];

        match self {
            Self::SaturationVaporPressure => physics::saturation_vapor_pressure(v(Q::Temperature)),
            Self::SaturationMixingRatio => {
                physics::saturation_mixing_ratio(v(Q::SaturationVaporPressure), v(Q::Pressure))
            }
            Self::RelativeHumidity => {
                physics::relative_humidity(v(Q::SpecificHumidity), v(Q::SaturationMixingRatio))
            }
            Self::MixingRatio => {
                physics::mixing_ratio(v(Q::SaturationMixingRatio), v(Q::RelativeHumidity))
            }
            Self::MixingRatioFromSpecificHumidity => {
                physics::mixing_ratio_from_specific_humidity(v(Q::SpecificHumidity))
            }
            Self::LiftingCondensationTemperature => {
                physics::lifting_condensation_temperature(v(Q::Temperature), v(Q::RelativeHumidity))
            }
            Self::EquivalentPotentialTemperature => physics::equivalent_potential_temperature(
                v(Q::MixingRatio),
                v(Q::Temperature),
                v(Q::LiftingCondensationTemperature),
                v(Q::Pressure),
            ),
            Self::WetBulbFromTheta => physics::wet_bulb_from_theta(v(Q::EquivalentPotentialTemperature)),
            Self::WetBulbStull => physics::wet_bulb_stull(v(Q::Temperature), v(Q::RelativeHumidity)),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
