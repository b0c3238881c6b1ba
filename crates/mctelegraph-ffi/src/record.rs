use mctelegraph_codec::{decode_record, encode_record_into};

use crate::error;
use crate::types::{MctgResult, MctgTelegraphData};

/// Encode `data` as a current-layout wire record into `out`.
///
/// On success `*written` holds the number of bytes produced. On failure
/// `out` is left untouched.
///
/// # Safety
/// `data` must point to a readable `MctgTelegraphData`. `out` must be writable for
/// `out_len` bytes. `written` must be null or writable for one `usize`.
#[no_mangle]
pub unsafe extern "C" fn mctg_encode_record(
    data: *const MctgTelegraphData,
    out: *mut u8,
    out_len: usize,
    written: *mut usize,
) -> MctgResult {
    crate::ffi_boundary(MctgResult::Internal, || {
        error::clear_error_state();

        if data.is_null() {
            return error::set_invalid_argument("data cannot be null");
        }
        if out.is_null() {
            return error::set_invalid_argument("out cannot be null");
        }

        let data = {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe { &*data }
        };
        let record = match data.to_record() {
            Ok(record) => record,
            Err(err) => return error::map_telegraph_error(&err),
        };

        let out = {
            // SAFETY: Caller guarantees `out` is writable for `out_len` bytes.
            unsafe { std::slice::from_raw_parts_mut(out, out_len) }
        };

        match encode_record_into(&record, out) {
            Ok(len) => {
                if !written.is_null() {
                    // SAFETY: Non-null `written` is guaranteed writable by the caller.
                    unsafe {
                        *written = len;
                    }
                }
                MctgResult::Ok
            }
            Err(err) => error::map_telegraph_error(&err),
        }
    })
}

/// Decode one wire record from `data` into `out`.
///
/// Legacy and newer-version records are accepted; `out->provisional` is set
/// for the latter. On failure `out` is left untouched.
///
/// # Safety
/// `data` must be readable for `len` bytes. `out` must point to a writable
/// `MctgTelegraphData`.
#[no_mangle]
pub unsafe extern "C" fn mctg_decode_record(
    data: *const u8,
    len: usize,
    out: *mut MctgTelegraphData,
) -> MctgResult {
    crate::ffi_boundary(MctgResult::Internal, || {
        error::clear_error_state();

        if data.is_null() {
            return error::set_invalid_argument("data cannot be null");
        }
        if out.is_null() {
            return error::set_invalid_argument("out cannot be null");
        }

        let bytes = {
            // SAFETY: Caller guarantees `data` is readable for `len` bytes.
            unsafe { std::slice::from_raw_parts(data, len) }
        };

        match decode_record(bytes) {
            Ok(decoded) => {
                // SAFETY: Pointer validity is guaranteed by the caller.
                unsafe {
                    *out = MctgTelegraphData::from_decoded(&decoded);
                }
                MctgResult::Ok
            }
            Err(err) => error::map_telegraph_error(&err),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use std::os::raw::c_char;

    use mctelegraph_codec::{OperatingMode, RECORD_SIZE};

    use super::*;

    fn sample() -> MctgTelegraphData {
        let mut data = MctgTelegraphData {
            channel_id: 1,
            membrane_cap: 3.3e-11,
            series_resistance: 1.0e7,
            ..MctgTelegraphData::default()
        };
        for (dst, src) in data.serial_number.iter_mut().zip(b"836") {
            *dst = *src as c_char;
        }
        data
    }

    #[test]
    fn encode_then_decode() {
        let data = sample();
        let mut wire = [0u8; RECORD_SIZE];
        let mut written = 0usize;

        // SAFETY: all pointers reference live locals of the stated size.
        let result =
            unsafe { mctg_encode_record(&data, wire.as_mut_ptr(), wire.len(), &mut written) };
        assert_eq!(result, MctgResult::Ok);
        assert_eq!(written, RECORD_SIZE);

        let mut out = MctgTelegraphData::default();
        // SAFETY: all pointers reference live locals of the stated size.
        let result = unsafe { mctg_decode_record(wire.as_ptr(), wire.len(), &mut out) };
        assert_eq!(result, MctgResult::Ok);
        assert_eq!(out.channel_id, 1);
        assert_eq!(out.series_resistance, 1.0e7);
        assert!(!out.provisional);
        // SAFETY: decoded text slots are always NUL-terminated.
        let serial = unsafe { CStr::from_ptr(out.serial_number.as_ptr()) };
        assert_eq!(serial.to_str().unwrap(), "836");
    }

    #[test]
    fn short_output_buffer_is_invalid_argument() {
        let data = sample();
        let mut wire = [0xAAu8; 64];

        // SAFETY: all pointers reference live locals of the stated size.
        let result = unsafe {
            mctg_encode_record(&data, wire.as_mut_ptr(), wire.len(), std::ptr::null_mut())
        };
        assert_eq!(result, MctgResult::InvalidArgument);
        assert!(wire.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn sentinel_violation_is_reported() {
        let mut data = sample();
        data.operating_mode = OperatingMode::CurrentClamp.as_u32();
        let mut wire = [0u8; RECORD_SIZE];

        // SAFETY: all pointers reference live locals of the stated size.
        let result = unsafe {
            mctg_encode_record(&data, wire.as_mut_ptr(), wire.len(), std::ptr::null_mut())
        };
        assert_eq!(result, MctgResult::SentinelViolation);

        // SAFETY: mctg_last_error returns a pointer to a thread-local CString.
        let message = unsafe { CStr::from_ptr(crate::mctg_last_error()) };
        assert!(!message.to_bytes().is_empty());
    }

    #[test]
    fn truncated_input_leaves_output_untouched() {
        let wire = [0u8; 100];
        let mut out = MctgTelegraphData {
            channel_id: 42,
            ..MctgTelegraphData::default()
        };

        // SAFETY: all pointers reference live locals of the stated size.
        let result = unsafe { mctg_decode_record(wire.as_ptr(), wire.len(), &mut out) };
        assert_eq!(result, MctgResult::TruncatedRecord);
        assert_eq!(out.channel_id, 42);
    }

    #[test]
    fn null_pointers_are_rejected() {
        let mut out = MctgTelegraphData::default();
        // SAFETY: null is checked before any dereference.
        let result = unsafe { mctg_decode_record(std::ptr::null(), 256, &mut out) };
        assert_eq!(result, MctgResult::InvalidArgument);

        // SAFETY: null is checked before any dereference.
        let result = unsafe {
            mctg_encode_record(std::ptr::null(), std::ptr::null_mut(), 0, std::ptr::null_mut())
        };
        assert_eq!(result, MctgResult::InvalidArgument);
    }
}
