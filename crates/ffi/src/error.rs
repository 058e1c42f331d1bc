use esm_thermo_core::ThermoError;
use std::borrow::Cow;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for errors reported across the FFI boundary.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message stored for `thermo_get_last_error`
///
/// Implemented by [`DefaultFfiError`] for boundary failures (null pointers,
/// oversized buffers) and by the core [`ThermoError`] for failures raised
/// while evaluating.
pub(crate) trait FfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> ThermoErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> Cow<'_, str>;
}

/// Errors detected at the boundary itself, before any core code runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFfiError {
    code: ThermoErrorCode,
    msg: String,
}

impl DefaultFfiError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"tref"`, `"out"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: ThermoErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a method name that is not valid UTF-8.
    pub fn method_not_utf8() -> Self {
        Self {
            code: ThermoErrorCode::InvalidMethod,
            msg: "Parameter 'method' is not valid UTF-8".to_string(),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: ThermoErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl FfiError for DefaultFfiError {
    fn code(&self) -> ThermoErrorCode {
        self.code
    }

    fn msg(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.msg)
    }
}

impl FfiError for ThermoError {
    fn code(&self) -> ThermoErrorCode {
        match self {
            ThermoError::UnsupportedMethod(_) => ThermoErrorCode::InvalidMethod,
            _ => ThermoErrorCode::InvalidParameter,
        }
    }

    fn msg(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

/// FFI error codes returned by thermodynamics functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermoErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Wet-bulb method name is not one of "Davies-Jones" or "Stull".
    InvalidMethod = 2,

    /// Invalid parameter passed to function.
    InvalidParameter = 3,
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is owned here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, ThermoErrorCode)> = const { RefCell::new((None, ThermoErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, ThermoErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, ThermoErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call failed.
/// - `null` if the last call succeeded or no call has been made.
///
/// # Thread Safety
/// Error messages are stored per-thread (thread-local storage), so this is thread-safe.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// ThermoErrorCode err = thermo_derive_wbt(tref, sh, p, n, "Davies-Jones", out);
/// if (err != Ok) {
///     const char* error = thermo_get_last_error();
///     if (error) {
///         fprintf(stderr, "wet-bulb derivation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn thermo_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns:
/// - `ThermoErrorCode::Ok` (0) if the last call succeeded
/// - The specific error code from the last failed operation
///
/// # Thread Safety
/// Error codes are stored per-thread (thread-local storage), so this is thread-safe.
#[no_mangle]
pub extern "C" fn thermo_get_last_error_code() -> ThermoErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
