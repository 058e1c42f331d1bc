//! Closed-form moist thermodynamics formulas
//!
//! Every function is a pure scalar map over [`Real`](crate::core_types::Real)
//! values. Nothing is clamped or validated: inputs outside a formula's domain
//! produce infinities or NaN, and those propagate through later stages.

pub mod humidity;
pub mod saturation;
pub mod wet_bulb;

pub use humidity::{mixing_ratio, mixing_ratio_from_specific_humidity, relative_humidity};
pub use saturation::{saturation_mixing_ratio, saturation_vapor_pressure, EPSILON_G_PER_KG};
pub use wet_bulb::{
    equivalent_potential_temperature, kelvin_to_celsius, lifting_condensation_temperature,
    wet_bulb_from_theta, wet_bulb_stull, CELSIUS_KELVIN_OFFSET,
};
