use std::ffi::c_char;
use std::ptr;

use kana_core::{ConversionPlan, Signal, TransduceError, Transducer};
use tracing::debug;

use super::{ffi_close, ffi_guard, owned_new};

// --- Streaming transducer FFI ---

/// Opaque per-stream conversion state.
pub struct KanaTransducer {
    inner: Transducer,
}

pub const KANA_FEED_DONE: u8 = 0;
pub const KANA_FEED_NEED_MORE_INPUT: u8 = 1;
pub const KANA_FEED_OUTPUT_FULL: u8 = 2;
/// Malformed UTF-8; `consumed` holds its offset in `src` and `written` the
/// output converted before it. Terminal until reset.
pub const KANA_FEED_INVALID_ENCODING: u8 = 3;
/// The stream already failed; call `kana_transducer_reset`.
pub const KANA_FEED_BROKEN: u8 = 4;
pub const KANA_FEED_INVALID_ARGUMENT: u8 = 5;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KanaFeedResult {
    pub consumed: usize,
    pub written: usize,
    pub status: u8,
}

impl KanaFeedResult {
    fn status(status: u8) -> Self {
        Self {
            consumed: 0,
            written: 0,
            status,
        }
    }
}

/// Compile `mode` and create a transducer. Returns null if the mode is
/// rejected; use `kana_mode_check` to obtain the reason.
#[no_mangle]
pub extern "C" fn kana_transducer_new(mode: *const c_char) -> *mut KanaTransducer {
    ffi_guard!(ptr::null_mut();
        str: mode_str = mode,
    );
    match ConversionPlan::compile(mode_str) {
        Ok(plan) => owned_new(KanaTransducer {
            inner: Transducer::new(plan),
        }),
        Err(e) => {
            debug!(error = %e, "kana_transducer_new rejected mode");
            ptr::null_mut()
        }
    }
}

/// Convert from `src` into `dst`; see `Transducer::transduce`. `at_eof` is
/// non-zero when no input follows `src`.
#[no_mangle]
pub extern "C" fn kana_transducer_feed(
    transducer: *mut KanaTransducer,
    src: *const u8,
    src_len: usize,
    dst: *mut u8,
    dst_cap: usize,
    at_eof: u8,
) -> KanaFeedResult {
    let invalid = KanaFeedResult::status(KANA_FEED_INVALID_ARGUMENT);
    ffi_guard!(invalid;
        mut: t = transducer,
        bytes: input = src, src_len,
    );
    let output: &mut [u8] = if dst_cap == 0 {
        &mut []
    } else if dst.is_null() {
        return invalid;
    } else {
        unsafe { std::slice::from_raw_parts_mut(dst, dst_cap) }
    };

    match t.inner.transduce(input, output, at_eof != 0) {
        Ok(progress) => KanaFeedResult {
            consumed: progress.consumed,
            written: progress.written,
            status: match progress.signal {
                Signal::Done => KANA_FEED_DONE,
                Signal::NeedMoreInput => KANA_FEED_NEED_MORE_INPUT,
                Signal::OutputBufferFull => KANA_FEED_OUTPUT_FULL,
            },
        },
        Err(TransduceError::InvalidEncoding { position, written }) => KanaFeedResult {
            consumed: position,
            written,
            status: KANA_FEED_INVALID_ENCODING,
        },
        Err(TransduceError::Broken) => KanaFeedResult::status(KANA_FEED_BROKEN),
    }
}

/// Clear buffered state and any encoding failure so the transducer can serve
/// a new stream.
#[no_mangle]
pub extern "C" fn kana_transducer_reset(transducer: *mut KanaTransducer) {
    if transducer.is_null() {
        return;
    }
    let t = unsafe { &mut *transducer };
    t.inner.reset();
}

ffi_close!(kana_transducer_free, KanaTransducer);
