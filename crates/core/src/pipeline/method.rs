//! Wet-bulb derivation method selector

use super::plan::{
    StagePlan, DAVIES_JONES_FROM_RH_PLAN, DAVIES_JONES_PLAN, STULL_FROM_RH_PLAN, STULL_PLAN,
};
use crate::error::ThermoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy for deriving wet-bulb temperature
///
/// Both strategies share the `esat → wsat → rh` prefix and differ only in
/// the tail: Davies-Jones goes through the lifting condensation temperature
/// and equivalent potential temperature, Stull applies a single empirical
/// regression and is cheaper per cell.
///
/// Parsed from the exact names `"Davies-Jones"` and `"Stull"`; anything
/// else fails with [`ThermoError::UnsupportedMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WetBulbMethod {
    /// Davies-Jones (2008) via the lifting condensation temperature
    #[default]
    #[serde(rename = "Davies-Jones")]
    DaviesJones,
    /// Stull (2011) direct regression
    #[serde(rename = "Stull")]
    Stull,
}

impl WetBulbMethod {
    /// Every supported method
    pub const ALL: [WetBulbMethod; 2] = [WetBulbMethod::DaviesJones, WetBulbMethod::Stull];

    /// Canonical selector string
    pub const fn name(self) -> &'static str {
        match self {
            Self::DaviesJones => "Davies-Jones",
            Self::Stull => "Stull",
        }
    }

    /// Stage plan taking `(tref, sh, p)`
    pub fn plan(self) -> &'static StagePlan {
        match self {
            Self::DaviesJones => &DAVIES_JONES_PLAN,
            Self::Stull => &STULL_PLAN,
        }
    }

    /// Stage plan taking `(tref, rh, p)`
    pub fn plan_from_relative_humidity(self) -> &'static StagePlan {
        match self {
            Self::DaviesJones => &DAVIES_JONES_FROM_RH_PLAN,
            Self::Stull => &STULL_FROM_RH_PLAN,
        }
    }
}

impl FromStr for WetBulbMethod {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| ThermoError::UnsupportedMethod(s.to_string()))
    }
}

impl fmt::Display for WetBulbMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_names() {
        assert_eq!("Davies-Jones".parse(), Ok(WetBulbMethod::DaviesJones));
        assert_eq!("Stull".parse(), Ok(WetBulbMethod::Stull));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for bad in ["stull", "DaviesJones", "", "Bolton"] {
            assert_eq!(
                bad.parse::<WetBulbMethod>(),
                Err(ThermoError::UnsupportedMethod(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_display_round_trips_parse() {
        for method in WetBulbMethod::ALL {
            assert_eq!(method.to_string().parse(), Ok(method));
        }
    }

    #[test]
    fn test_serde_uses_selector_names() {
        assert_eq!(
            serde_json::to_string(&WetBulbMethod::DaviesJones).unwrap(),
            "\"Davies-Jones\""
        );
        let parsed: WetBulbMethod = serde_json::from_str("\"Stull\"").unwrap();
        assert_eq!(parsed, WetBulbMethod::Stull);
        assert!(serde_json::from_str::<WetBulbMethod>("\"Magnus\"").is_err());
    }

    #[test]
    fn test_plans_end_in_wet_bulb() {
        for method in WetBulbMethod::ALL {
            assert_eq!(method.plan().output().short_name(), "wbt");
            assert_eq!(method.plan_from_relative_humidity().output().short_name(), "wbt");
        }
    }
}
