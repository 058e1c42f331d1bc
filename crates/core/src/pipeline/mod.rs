//! Thermodynamic derivation pipeline
//!
//! Scalar entry points composing the formulas in [`crate::physics`] through
//! validated [`StagePlan`]s. The grid-level versions in [`crate::grid`] run
//! the same plans per cell, so scalar and gridded results agree exactly.
//!
//! # Example
//!
//! ```
//! use esm_thermo_core::pipeline::{derive_rh, derive_wbt, WetBulbMethod};
//!
//! let method: WetBulbMethod = "Davies-Jones".parse().unwrap();
//! let wbt = derive_wbt(300.0_f64, 0.01, 1013.0, method);
//! let rh = derive_rh(300.0_f64, 0.01, 1013.0);
//!
//! assert!(wbt < 26.85);
//! assert!(rh > 40.0 && rh < 50.0);
//! ```

mod method;
mod plan;
mod stage;

pub use method::WetBulbMethod;
pub use plan::{
    StagePlan, DAVIES_JONES_FROM_RH_PLAN, DAVIES_JONES_PLAN, MAX_PLAN_INPUTS,
    RELATIVE_HUMIDITY_PLAN, RELATIVE_HUMIDITY_STAGES, STULL_FROM_RH_PLAN, STULL_PLAN,
};
pub use stage::Stage;

use crate::core_types::Real;

/// Wet-bulb temperature (°C) from temperature (K), specific humidity (kg/kg)
/// and pressure (mbar)
#[inline]
pub fn derive_wbt<T: Real>(tref: T, sh: T, p: T, method: WetBulbMethod) -> T {
    method.plan().evaluate_unchecked(&[tref, sh, p])
}

/// Relative humidity (%) from temperature (K), specific humidity (kg/kg)
/// and pressure (mbar)
#[inline]
pub fn derive_rh<T: Real>(tref: T, sh: T, p: T) -> T {
    RELATIVE_HUMIDITY_PLAN.evaluate_unchecked(&[tref, sh, p])
}

/// Wet-bulb temperature (°C) from temperature (K), relative humidity (%)
/// and pressure (mbar)
///
/// The Stull method ignores `p`.
#[inline]
pub fn derive_wbt_from_rh<T: Real>(tref: T, rh: T, p: T, method: WetBulbMethod) -> T {
    method.plan_from_relative_humidity().evaluate_unchecked(&[tref, rh, p])
}
