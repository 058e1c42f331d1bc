//! Moist Thermodynamics Core Library
//!
//! Closed-form thermodynamic formulas for post-processed climate model
//! output: saturation vapor pressure, saturation mixing ratio, relative
//! humidity, lifting condensation temperature, equivalent potential
//! temperature and wet-bulb temperature, applied element-wise over gridded
//! fields.
//!
//! ## Derivation chains
//!
//! Wet-bulb temperature can be derived two ways from temperature, specific
//! humidity and pressure:
//! - **Davies-Jones**: `esat → wsat → rh → w → tl → theta → wbt`
//! - **Stull**: `esat → wsat → rh → wbt_stull`
//!
//! Both share the `esat → wsat → rh` prefix used on its own for relative
//! humidity. Chains are expressed as validated [`StagePlan`]s so the scalar
//! and gridded entry points run identical arithmetic.
//!
//! Numeric domain violations are not errors: they propagate as infinities
//! or NaN, exactly as IEEE arithmetic produces them.

// Core types and utilities
pub mod config;
pub mod core_types;
pub mod error;

// Formulas, derivation chains and gridded evaluation
pub mod grid;
pub mod physics;
pub mod pipeline;

// Re-export core types
pub use config::ComputeConfig;
pub use core_types::{Quantity, Real};
pub use error::{ThermoError, ThermoResult};

// Re-export pipeline and grid entry points
pub use grid::{
    evaluate_plan, evaluate_plan_labeled, evaluate_plan_slices, relative_humidity,
    wet_bulb_temperature, wet_bulb_temperature_from_rh, LabeledField,
};
pub use pipeline::{derive_rh, derive_wbt, derive_wbt_from_rh, Stage, StagePlan, WetBulbMethod};
