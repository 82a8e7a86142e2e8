//! C ABI surface.
//!
//! ```c
//! char *out = markdownify(text);
//! /* ... */
//! free_result(out);
//! ```
//!
//! `markdownify` never fails visibly: a null input yields null, anything
//! else yields a newly allocated string owned by the caller, either the
//! transformed text or a copy of the input. Every non-null result must be
//! released exactly once with `free_result`.

#![allow(unsafe_code)]

use std::ffi::{c_char, CStr, CString};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use tracing::{error, warn};

use crate::bridge::{Bridge, Outcome};
use crate::runtime::Loader;
use crate::types::Error;

/// Transform a NUL-terminated UTF-8 string.
///
/// # Safety
///
/// `markdown_text` must be null or point to a valid NUL-terminated string
/// that stays alive and unmodified for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn markdownify(markdown_text: *const c_char) -> *mut c_char {
    if markdown_text.is_null() {
        return ptr::null_mut();
    }

    // SAFETY: non-null and NUL-terminated per the caller contract.
    let input = unsafe { CStr::from_ptr(markdown_text) };
    transform_c_str(crate::global(), input).into_raw()
}

/// Release a string returned by [`markdownify`]. Null is a no-op.
///
/// # Safety
///
/// `result` must be null or a pointer obtained from [`markdownify`] that
/// has not been released yet.
#[no_mangle]
pub unsafe extern "C" fn free_result(result: *mut c_char) {
    if result.is_null() {
        return;
    }

    // SAFETY: produced by CString::into_raw in `markdownify` and released
    // at most once per the caller contract.
    drop(unsafe { CString::from_raw(result) });
}

/// Gateway pass for a native string. Non-UTF-8 input, results that cannot
/// be represented as C strings, and panics all return a copy of `input`.
pub(crate) fn transform_c_str<L: Loader>(bridge: &Bridge<L>, input: &CStr) -> CString {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| match input.to_str() {
        Ok(text) => bridge.run(text),
        Err(err) => bridge.passthrough(&Error::marshal(format!("input is not UTF-8: {err}"))),
    }));

    match outcome {
        Ok(Outcome::Transformed(text)) => CString::new(text).unwrap_or_else(|err| {
            warn!(error = %err, "transformed text contains NUL, passing text through");
            input.to_owned()
        }),
        Ok(Outcome::Passthrough(_)) => input.to_owned(),
        Err(_) => {
            error!("panic inside markdownify bridge, passing text through");
            input.to_owned()
        }
    }
}
