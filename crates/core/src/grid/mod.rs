//! Element-wise evaluation over gridded fields
//!
//! Three levels of input are supported:
//! - flat buffers ([`evaluate_plan_slices`]), used by the C interface
//! - plain N-dimensional arrays with NumPy broadcasting ([`evaluate_plan`])
//! - labeled fields aligned by dimension name ([`evaluate_plan_labeled`])
//!
//! The wrappers below run the built-in plans over labeled fields. The
//! output element type is the input element type, so `f32` temperature
//! fields yield `f32` results.

mod broadcast;
mod evaluate;
mod labeled;

pub use broadcast::{broadcast_len, broadcast_shape};
pub use evaluate::{evaluate_plan, evaluate_plan_slices};
pub use labeled::{evaluate_plan_labeled, LabeledField};

use crate::config::ComputeConfig;
use crate::core_types::Real;
use crate::error::ThermoResult;
use crate::pipeline::{WetBulbMethod, RELATIVE_HUMIDITY_PLAN};

/// Wet-bulb temperature field (°C) from temperature (K), specific humidity
/// (kg/kg) and pressure (mbar)
///
/// # Errors
///
/// Fails if the fields cannot be aligned; see [`evaluate_plan_labeled`].
pub fn wet_bulb_temperature<T: Real>(
    tref: &LabeledField<T>,
    sh: &LabeledField<T>,
    p: &LabeledField<T>,
    method: WetBulbMethod,
    config: &ComputeConfig,
) -> ThermoResult<LabeledField<T>> {
    evaluate_plan_labeled(method.plan(), &[tref, sh, p], config)
}

/// Relative humidity field (%) from temperature (K), specific humidity
/// (kg/kg) and pressure (mbar)
///
/// # Errors
///
/// Fails if the fields cannot be aligned; see [`evaluate_plan_labeled`].
pub fn relative_humidity<T: Real>(
    tref: &LabeledField<T>,
    sh: &LabeledField<T>,
    p: &LabeledField<T>,
    config: &ComputeConfig,
) -> ThermoResult<LabeledField<T>> {
    evaluate_plan_labeled(&RELATIVE_HUMIDITY_PLAN, &[tref, sh, p], config)
}

/// Wet-bulb temperature field (°C) from temperature (K), relative humidity
/// (%) and pressure (mbar)
///
/// # Errors
///
/// Fails if the fields cannot be aligned; see [`evaluate_plan_labeled`].
pub fn wet_bulb_temperature_from_rh<T: Real>(
    tref: &LabeledField<T>,
    rh: &LabeledField<T>,
    p: &LabeledField<T>,
    method: WetBulbMethod,
    config: &ComputeConfig,
) -> ThermoResult<LabeledField<T>> {
    evaluate_plan_labeled(method.plan_from_relative_humidity(), &[tref, rh, p], config)
}
