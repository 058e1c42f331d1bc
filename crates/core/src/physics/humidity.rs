//! Humidity conversions between specific humidity, mixing ratio and relative humidity
//!
//! # Scientific References
//! - Wallace, J.M. & Hobbs, P.V. (2006). "Atmospheric Science: An Introductory Survey", ch. 3
//! - Penn State METEO 300, "Humidity variables" (mixing ratio from specific humidity)

use crate::core_types::Real;

/// Calculate relative humidity from specific humidity and saturation mixing ratio
///
/// ```text
/// rh = 100 · sh / ((1 - sh) · wsat / 1000)
/// ```
///
/// The result is not clamped to [0, 100]. Singular at `sh == 1`.
///
/// # Arguments
/// * `sh` - Specific humidity (kg/kg)
/// * `wsat` - Saturation mixing ratio (g/kg)
///
/// # Returns
/// Relative humidity (%)
#[inline]
pub fn relative_humidity<T: Real>(sh: T, wsat: T) -> T {
    T::lit(100.0) * sh / ((T::lit(1.0) - sh) * wsat / T::lit(1000.0))
}

/// Calculate mixing ratio from saturation mixing ratio and relative humidity
///
/// ```text
/// w = rh / 100 · wsat
/// ```
///
/// # Arguments
/// * `wsat` - Saturation mixing ratio (g/kg)
/// * `rh` - Relative humidity (%)
///
/// # Returns
/// Mixing ratio (g/kg)
#[inline]
pub fn mixing_ratio<T: Real>(wsat: T, rh: T) -> T {
    rh / T::lit(100.0) * wsat
}

/// Calculate mixing ratio directly from specific humidity
///
/// ```text
/// w = 1000 · sh / (1 - sh)
/// ```
///
/// Singular at `sh == 1`.
///
/// # Arguments
/// * `sh` - Specific humidity (kg/kg)
///
/// # Returns
/// Mixing ratio (g/kg)
#[inline]
pub fn mixing_ratio_from_specific_humidity<T: Real>(sh: T) -> T {
    T::lit(1000.0) * sh / (T::lit(1.0) - sh)
}
