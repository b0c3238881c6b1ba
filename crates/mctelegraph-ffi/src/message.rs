use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::OnceLock;

use mctelegraph_codec::TelegraphMessage;

use crate::error;

fn message_names() -> &'static [CString] {
    static NAMES: OnceLock<Vec<CString>> = OnceLock::new();
    NAMES.get_or_init(|| {
        TelegraphMessage::ALL
            .iter()
            .filter_map(|message| CString::new(message.as_str()).ok())
            .collect()
    })
}

/// Registered notification name for `kind`, an index into the message list
/// (0 = open … 9 = commander lock).
///
/// Returns null for an unknown kind. The string is static; do not free it.
#[no_mangle]
pub extern "C" fn mctg_message_name(kind: u32) -> *const c_char {
    crate::ffi_boundary(std::ptr::null(), || {
        error::clear_error_state();

        match message_names().get(kind as usize) {
            Some(name) => name.as_ptr(),
            None => {
                error::set_invalid_argument(format!("unknown message kind {kind}"));
                std::ptr::null()
            }
        }
    })
}
