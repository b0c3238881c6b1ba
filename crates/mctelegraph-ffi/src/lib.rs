//! mctelegraph-ffi: C-ABI exports for MultiClamp telegraph records and channel ids.

mod channel;
mod error;
mod message;
mod record;
mod types;

use std::panic::AssertUnwindSafe;

pub use channel::{
    mctg_match_700a_signal_ids, mctg_match_700b_signal_ids, mctg_pack_700a_signal_ids,
    mctg_pack_700b_signal_ids, mctg_unpack_700a_signal_ids, mctg_unpack_700b_signal_ids,
};
pub use message::mctg_message_name;
pub use record::{mctg_decode_record, mctg_encode_record};
pub use types::{
    MctgOutputSignal, MctgResult, MctgTelegraphData, MCTG_API_VERSION, MCTG_ERR_INTERNAL,
    MCTG_ERR_INVALID_ARGUMENT, MCTG_ERR_INVALID_FIELD, MCTG_ERR_SENTINEL_VIOLATION,
    MCTG_ERR_TRUNCATED_RECORD, MCTG_ERR_UNSUPPORTED_VERSION, MCTG_OK, MCTG_RECORD_SIZE,
    MCTG_TEXT_SIZE,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

#[no_mangle]
pub extern "C" fn mctg_init() -> MctgResult {
    ffi_boundary(MctgResult::Internal, || {
        error::clear_error_state();
        MctgResult::Ok
    })
}

#[no_mangle]
pub extern "C" fn mctg_cleanup() {
    ffi_boundary((), || {
        error::clear_error_state();
    });
}

#[no_mangle]
pub extern "C" fn mctg_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}
