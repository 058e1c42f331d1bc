//! C interface for the moist thermodynamics pipeline
//!
//! Every function fills a caller-owned `out` buffer of `len` doubles from
//! three caller-owned input buffers of the same length, and returns a
//! [`ThermoErrorCode`]. On failure the message is available from
//! [`thermo_get_last_error`] on the same thread; on success the last error
//! is cleared.
//!
//! Non-finite results are not failures: cells whose inputs fall outside a
//! formula's domain are written as NaN or infinity.

mod error;
mod helpers;

pub use error::{thermo_get_last_error, thermo_get_last_error_code, ThermoErrorCode};

use error::DefaultFfiError;
use esm_thermo_core::pipeline::RELATIVE_HUMIDITY_PLAN;
use esm_thermo_core::{evaluate_plan_slices, ComputeConfig, StagePlan, WetBulbMethod};
use helpers::{clear_last_error, track_error};
use std::ffi::CStr;
use std::mem;
use std::os::raw::c_char;
use std::slice;

/// Largest element count a single buffer may describe
const MAX_BUFFER_LEN: usize = isize::MAX as usize / mem::size_of::<f64>();

/// Borrow a caller buffer of `len` doubles, recording an error for null.
///
/// # Safety
/// A non-null `ptr` must be valid for reads of `len` doubles for `'a`.
unsafe fn input_buffer<'a>(
    ptr: *const f64,
    len: usize,
    name: &str,
) -> Result<&'a [f64], ThermoErrorCode> {
    if ptr.is_null() {
        return Err(track_error(&DefaultFfiError::null_pointer(name)));
    }
    Ok(slice::from_raw_parts(ptr, len))
}

/// Parse a NUL-terminated method name.
///
/// # Safety
/// A non-null `method` must point to a NUL-terminated string.
unsafe fn parse_method(method: *const c_char) -> Result<WetBulbMethod, ThermoErrorCode> {
    if method.is_null() {
        return Err(track_error(&DefaultFfiError::null_pointer("method")));
    }
    let name = CStr::from_ptr(method)
        .to_str()
        .map_err(|_| track_error(&DefaultFfiError::method_not_utf8()))?;
    name.parse::<WetBulbMethod>().map_err(|e| track_error(&e))
}

/// Run `plan` over three input buffers into `out`.
///
/// # Safety
/// Same contract as the public functions: non-null buffers hold `len`
/// doubles and `out` does not overlap any input.
unsafe fn run_plan(
    plan: &StagePlan,
    inputs: [(*const f64, &str); 3],
    len: usize,
    out: *mut f64,
) -> Result<(), ThermoErrorCode> {
    if len > MAX_BUFFER_LEN {
        return Err(track_error(&DefaultFfiError::invalid_parameter(format!(
            "Parameter 'len' is too large: {len}"
        ))));
    }

    let [(a, a_name), (b, b_name), (c, c_name)] = inputs;
    let a = input_buffer(a, len, a_name)?;
    let b = input_buffer(b, len, b_name)?;
    let c = input_buffer(c, len, c_name)?;
    if out.is_null() {
        return Err(track_error(&DefaultFfiError::null_pointer("out")));
    }
    let out = slice::from_raw_parts_mut(out, len);

    evaluate_plan_slices(plan, &[a, b, c], out, &ComputeConfig::default())
        .map_err(|e| track_error(&e))
}

fn finish(result: Result<(), ThermoErrorCode>) -> ThermoErrorCode {
    match result {
        Ok(()) => {
            clear_last_error();
            ThermoErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Derive wet-bulb temperature from temperature, specific humidity and pressure.
///
/// # Arguments
/// * `tref` - Temperature (K), `len` values
/// * `sh` - Specific humidity (kg/kg), `len` values
/// * `p` - Pressure (mbar), `len` values
/// * `len` - Number of grid cells
/// * `method` - `"Davies-Jones"` or `"Stull"`, NUL-terminated
/// * `out` - Receives wet-bulb temperature (°C), `len` values
///
/// # Returns
/// - `Ok` on success
/// - `NullPointer` if any pointer is null
/// - `InvalidMethod` if `method` names no supported method
/// - `InvalidParameter` if `len` is too large
///
/// # Safety
/// `tref`, `sh` and `p` must be valid for reads of `len` doubles, `out`
/// must be valid for writes of `len` doubles and must not overlap the
/// inputs, and `method` must point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn thermo_derive_wbt(
    tref: *const f64,
    sh: *const f64,
    p: *const f64,
    len: usize,
    method: *const c_char,
    out: *mut f64,
) -> ThermoErrorCode {
    let result = parse_method(method).and_then(|method| {
        run_plan(
            method.plan(),
            [(tref, "tref"), (sh, "sh"), (p, "p")],
            len,
            out,
        )
    });
    finish(result)
}

/// Derive relative humidity from temperature, specific humidity and pressure.
///
/// # Arguments
/// * `tref` - Temperature (K), `len` values
/// * `sh` - Specific humidity (kg/kg), `len` values
/// * `p` - Pressure (mbar), `len` values
/// * `len` - Number of grid cells
/// * `out` - Receives relative humidity (%), `len` values
///
/// # Returns
/// - `Ok` on success
/// - `NullPointer` if any pointer is null
/// - `InvalidParameter` if `len` is too large
///
/// # Safety
/// `tref`, `sh` and `p` must be valid for reads of `len` doubles, and `out`
/// must be valid for writes of `len` doubles and must not overlap the inputs.
#[no_mangle]
pub unsafe extern "C" fn thermo_derive_rh(
    tref: *const f64,
    sh: *const f64,
    p: *const f64,
    len: usize,
    out: *mut f64,
) -> ThermoErrorCode {
    finish(run_plan(
        &RELATIVE_HUMIDITY_PLAN,
        [(tref, "tref"), (sh, "sh"), (p, "p")],
        len,
        out,
    ))
}

/// Derive wet-bulb temperature from temperature, relative humidity and pressure.
///
/// The Stull method does not use pressure, but `p` must still be valid.
///
/// # Arguments
/// * `tref` - Temperature (K), `len` values
/// * `rh` - Relative humidity (%), `len` values
/// * `p` - Pressure (mbar), `len` values
/// * `len` - Number of grid cells
/// * `method` - `"Davies-Jones"` or `"Stull"`, NUL-terminated
/// * `out` - Receives wet-bulb temperature (°C), `len` values
///
/// # Returns
/// Same codes as [`thermo_derive_wbt`].
///
/// # Safety
/// Same requirements as [`thermo_derive_wbt`].
#[no_mangle]
pub unsafe extern "C" fn thermo_derive_wbt_from_rh(
    tref: *const f64,
    rh: *const f64,
    p: *const f64,
    len: usize,
    method: *const c_char,
    out: *mut f64,
) -> ThermoErrorCode {
    let result = parse_method(method).and_then(|method| {
        run_plan(
            method.plan_from_relative_humidity(),
            [(tref, "tref"), (rh, "rh"), (p, "p")],
            len,
            out,
        )
    });
    finish(result)
}
