use std::ffi::{c_char, CString};
use std::ptr;

use kana_core::{convert_bytes, ModeConfig};
use tracing::debug;

use super::{ffi_guard, string_into_raw};

// --- Whole-value conversion FFI ---

/// Result of a whole-value conversion. On success `text` is set and `error`
/// is null; on failure `error` holds the message and `text` is null. Both are
/// null when an argument was rejected.
#[repr(C)]
pub struct KanaConvertResult {
    pub text: *const c_char,
    pub error: *const c_char,
    pub(crate) _owned: *mut CString,
}

impl KanaConvertResult {
    pub(crate) fn empty() -> Self {
        Self {
            text: ptr::null(),
            error: ptr::null(),
            _owned: ptr::null_mut(),
        }
    }

    fn text(s: String) -> Self {
        let Ok(cs) = CString::new(s) else {
            return Self::error("converted text contains a NUL byte".to_string());
        };
        let text = cs.as_ptr();
        Self {
            text,
            error: ptr::null(),
            _owned: Box::into_raw(Box::new(cs)),
        }
    }

    fn error(msg: String) -> Self {
        let Ok(cs) = CString::new(msg) else {
            return Self::empty();
        };
        let error = cs.as_ptr();
        Self {
            text: ptr::null(),
            error,
            _owned: Box::into_raw(Box::new(cs)),
        }
    }
}

fn pack(input: &[u8], mode: &str) -> KanaConvertResult {
    match convert_bytes(input, mode) {
        Ok(text) => KanaConvertResult::text(text),
        Err(e) => {
            debug!(error = %e, "conversion failed");
            KanaConvertResult::error(e.to_string())
        }
    }
}

/// Convert a NUL-terminated UTF-8 string.
#[no_mangle]
pub extern "C" fn kana_convert(text: *const c_char, mode: *const c_char) -> KanaConvertResult {
    ffi_guard!(KanaConvertResult::empty();
        str: text_str = text,
        str: mode_str = mode,
    );
    pack(text_str.as_bytes(), mode_str)
}

/// Convert `len` bytes at `data`, which need not be NUL-terminated or valid
/// UTF-8; malformed input is reported through `error`.
#[no_mangle]
pub extern "C" fn kana_convert_bytes(
    data: *const u8,
    len: usize,
    mode: *const c_char,
) -> KanaConvertResult {
    ffi_guard!(KanaConvertResult::empty();
        bytes: input = data, len,
        str: mode_str = mode,
    );
    pack(input, mode_str)
}

#[no_mangle]
pub extern "C" fn kana_convert_result_free(result: KanaConvertResult) {
    if !result._owned.is_null() {
        unsafe {
            drop(Box::from_raw(result._owned));
        }
    }
}

// --- Mode validation FFI ---

/// Check a mode string. Returns null when it compiles, otherwise the error
/// message (free with `kana_string_free`).
#[no_mangle]
pub extern "C" fn kana_mode_check(mode: *const c_char) -> *mut c_char {
    ffi_guard!(string_into_raw("mode is null or not valid UTF-8");
        str: mode_str = mode,
    );
    match ModeConfig::parse(mode_str) {
        Ok(_) => ptr::null_mut(),
        Err(e) => string_into_raw(e.to_string()),
    }
}
