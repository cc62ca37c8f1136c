//! Binding to the native `cryptingtool` engine library.

use std::ffi::{CStr, CString, c_char, c_int, c_uchar};

use crate::gateway::{BoundaryCall, STATUS_INVALID_PARAMS, TransformEngine};

#[link(name = "cryptingtool")]
unsafe extern "C" {
    fn crypto_bridge_process(
        algorithm: c_int,
        mode: c_int,
        key_size_bits: c_int,
        operation: c_int,
        password: *const c_char,
        password_len: c_int,
        input_data: *const c_uchar,
        input_len: c_int,
        output_data: *mut c_uchar,
        output_len: *mut c_int,
        iv: *mut c_uchar,
        auth_tag: *mut c_uchar,
    ) -> c_int;

    fn crypto_bridge_version() -> *const c_char;
}

/// The native engine. The library exports no id queries, so both report
/// `None` and callers fall back to the capability matrix.
#[derive(Debug, Default)]
pub struct NativeEngine;

impl TransformEngine for NativeEngine {
    fn process(&self, call: &mut BoundaryCall<'_>) -> i32 {
        // The C side expects a NUL-terminated password plus an explicit length.
        let Ok(password) = CString::new(call.password) else {
            return STATUS_INVALID_PARAMS;
        };
        let (Ok(password_len), Ok(input_len)) = (c_int::try_from(call.password.len()), c_int::try_from(call.input.len())) else {
            return STATUS_INVALID_PARAMS;
        };

        // SAFETY: every pointer comes from a live Rust borrow held for the
        // duration of the call. `output_len` carries the true capacity of
        // `output`, and `iv`/`auth_tag` are exactly 16 bytes as the contract
        // requires.
        unsafe {
            crypto_bridge_process(
                call.algorithm,
                call.mode,
                call.key_size_bits,
                call.operation,
                password.as_ptr(),
                password_len,
                call.input.as_ptr(),
                input_len,
                call.output.as_mut_ptr(),
                std::ptr::from_mut(&mut *call.output_len),
                call.iv.as_mut_ptr(),
                call.auth_tag.as_mut_ptr(),
            )
        }
    }

    fn version(&self) -> Option<String> {
        // SAFETY: the library returns either null or a static NUL-terminated string.
        let ptr = unsafe { crypto_bridge_version() };
        if ptr.is_null() {
            return None;
        }

        // SAFETY: checked non-null above; the string is static.
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }

    fn algorithm_ids(&self) -> Option<Vec<i32>> {
        None
    }

    fn mode_ids(&self) -> Option<Vec<i32>> {
        None
    }
}
