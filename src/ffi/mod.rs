//! FFI layer – each sub-module exposes one area of the C API.
//!
//! Types and helper functions shared across sub-modules live here
//! (macros, owned-pointer helpers, C string helpers).

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

pub mod convert;
pub mod stream;


// Re-export all public FFI symbols so `pub use ffi::*;` in lib.rs works.
pub use convert::*;
pub use stream::*;

// --- Generic owned-pointer helpers for FFI resource management ---

/// Allocate a value on the heap and return a raw pointer suitable for FFI.
/// The caller is responsible for eventually passing the pointer to [`owned_drop`].
pub(crate) fn owned_new<T>(value: T) -> *mut T {
    Box::into_raw(Box::new(value))
}

/// Free a heap-allocated value previously created by [`owned_new`].
/// No-op if `ptr` is null.
///
/// # Safety
/// `ptr` must have been produced by [`owned_new`] (i.e. `Box::into_raw`)
/// and must not have been freed already.
pub(crate) unsafe fn owned_drop<T>(ptr: *mut T) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Safely convert a C string pointer to a `&str`.
/// Returns `None` if the pointer is null or contains invalid UTF-8.
pub(crate) unsafe fn cptr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Hand a Rust string to C as a NUL-terminated heap string, freed with
/// [`kana_string_free`]. Returns null if `s` contains an interior NUL.
pub(crate) fn string_into_raw(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).map_or(ptr::null_mut(), CString::into_raw)
}

// ---------------------------------------------------------------------------
// FFI boilerplate-reduction macros (crate-internal)
// ---------------------------------------------------------------------------

/// Validate one or more FFI arguments and bind them as safe Rust values,
/// returning `$on_err` from the **calling** function if any check fails.
///
/// # Supported argument forms
///
/// | Syntax | What it does |
/// |--------|--------------|
/// | `str: $name = $ptr` | Null-check `$ptr: *const c_char`, convert via [`cptr_to_str`] to `&str`, bind as `$name`. |
/// | `mut: $name = $ptr` | Null-check `$ptr: *mut T`, dereference to `&mut T`, bind as `$name`. |
/// | `bytes: $name = $ptr, $len` | Bind `$ptr: *const u8` with `$len` bytes as `&[u8]`; null is only accepted with zero length. |
///
/// # Examples
///
/// ```ignore
/// ffi_guard!(KanaConvertResult::empty();
///     str: text = text_ptr,
///     str: mode = mode_ptr,
/// );
/// ```
macro_rules! ffi_guard {
    ($on_err:expr ; ) => {};

    ($on_err:expr ; str: $name:ident = $ptr:expr , $($rest:tt)*) => {
        let Some($name) = (unsafe { $crate::ffi::cptr_to_str($ptr) }) else {
            return $on_err;
        };
        $crate::ffi::ffi_guard!($on_err ; $($rest)*);
    };

    ($on_err:expr ; mut: $name:ident = $ptr:expr , $($rest:tt)*) => {
        if $ptr.is_null() {
            return $on_err;
        }
        let $name = unsafe { &mut *$ptr };
        $crate::ffi::ffi_guard!($on_err ; $($rest)*);
    };

    ($on_err:expr ; bytes: $name:ident = $ptr:expr , $len:expr , $($rest:tt)*) => {
        let $name: &[u8] = if $len == 0 {
            &[]
        } else if $ptr.is_null() {
            return $on_err;
        } else {
            unsafe { std::slice::from_raw_parts($ptr, $len) }
        };
        $crate::ffi::ffi_guard!($on_err ; $($rest)*);
    };
}

/// Define an `extern "C"` function that closes (frees) a heap-allocated resource.
macro_rules! ffi_close {
    ($fn_name:ident, $T:ty) => {
        #[no_mangle]
        pub extern "C" fn $fn_name(ptr: *mut $T) {
            unsafe { $crate::ffi::owned_drop(ptr) };
        }
    };
}

// Make macros available to sub-modules.
pub(crate) use ffi_close;
pub(crate) use ffi_guard;

// --- Top-level FFI functions ---

#[no_mangle]
pub extern "C" fn kana_engine_version() -> *const c_char {
    c"0.1.0".as_ptr()
}

/// Free a string returned by this library. No-op on null.
#[no_mangle]
pub extern "C" fn kana_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe { drop(CString::from_raw(s)) };
    }
}

#[no_mangle]
#[allow(clippy::unused_unit)]
pub extern "C" fn kana_trace_init(log_dir: *const c_char) {
    ffi_guard!(();
        str: dir_str = log_dir,
    );
    crate::trace_init::init_tracing(Path::new(dir_str));
}
