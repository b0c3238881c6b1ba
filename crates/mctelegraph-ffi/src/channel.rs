use mctelegraph_codec::{decode_channel_id, ChannelId, ChannelScheme};

use crate::error;
use crate::types::MctgResult;

/// Pack a 700A channel identity. Fields wider than their slot are masked.
#[no_mangle]
pub extern "C" fn mctg_pack_700a_signal_ids(
    com_port_id: u32,
    axobus_id: u32,
    channel_id: u32,
) -> u32 {
    crate::ffi_boundary(0, || {
        ChannelId::Mc700A {
            com_port_id,
            axobus_id,
            channel_id,
        }
        .pack()
    })
}

/// Unpack a 700A channel identity.
///
/// Returns `InvalidArgument` without writing anything if any destination is null.
///
/// # Safety
/// Non-null destinations must be valid for a `u32` write.
#[no_mangle]
pub unsafe extern "C" fn mctg_unpack_700a_signal_ids(
    word: u32,
    com_port_id: *mut u32,
    axobus_id: *mut u32,
    channel_id: *mut u32,
) -> MctgResult {
    crate::ffi_boundary(MctgResult::Internal, || {
        error::clear_error_state();

        if com_port_id.is_null() || axobus_id.is_null() || channel_id.is_null() {
            return error::set_invalid_argument("output pointers cannot be null");
        }

        if let ChannelId::Mc700A {
            com_port_id: com,
            axobus_id: bus,
            channel_id: chan,
        } = decode_channel_id(ChannelScheme::Mc700A, word)
        {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe {
                *com_port_id = com;
                *axobus_id = bus;
                *channel_id = chan;
            }
        }

        MctgResult::Ok
    })
}

/// Returns true if `word` names the given 700A channel.
#[no_mangle]
pub extern "C" fn mctg_match_700a_signal_ids(
    com_port_id: u32,
    axobus_id: u32,
    channel_id: u32,
    word: u32,
) -> bool {
    crate::ffi_boundary(false, || {
        ChannelId::Mc700A {
            com_port_id,
            axobus_id,
            channel_id,
        }
        .matches(word)
    })
}

/// Pack a 700B channel identity. Fields wider than their slot are masked.
#[no_mangle]
pub extern "C" fn mctg_pack_700b_signal_ids(serial_number: u32, channel_id: u32) -> u32 {
    crate::ffi_boundary(0, || {
        ChannelId::Mc700B {
            serial_number,
            channel_id,
        }
        .pack()
    })
}

/// Unpack a 700B channel identity.
///
/// Returns `InvalidArgument` without writing anything if any destination is null.
///
/// # Safety
/// Non-null destinations must be valid for a `u32` write.
#[no_mangle]
pub unsafe extern "C" fn mctg_unpack_700b_signal_ids(
    word: u32,
    serial_number: *mut u32,
    channel_id: *mut u32,
) -> MctgResult {
    crate::ffi_boundary(MctgResult::Internal, || {
        error::clear_error_state();

        if serial_number.is_null() || channel_id.is_null() {
            return error::set_invalid_argument("output pointers cannot be null");
        }

        if let ChannelId::Mc700B {
            serial_number: serial,
            channel_id: chan,
        } = decode_channel_id(ChannelScheme::Mc700B, word)
        {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe {
                *serial_number = serial;
                *channel_id = chan;
            }
        }

        MctgResult::Ok
    })
}

/// Returns true if `word` names the given 700B channel.
#[no_mangle]
pub extern "C" fn mctg_match_700b_signal_ids(
    serial_number: u32,
    channel_id: u32,
    word: u32,
) -> bool {
    crate::ffi_boundary(false, || {
        ChannelId::Mc700B {
            serial_number,
            channel_id,
        }
        .matches(word)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_700a() {
        let word = mctg_pack_700a_signal_ids(0x78, 0x56, 0x1234);
        assert_eq!(word, 0x1234_5678);

        let (mut com, mut bus, mut chan) = (0u32, 0u32, 0u32);
        // SAFETY: all destinations are valid locals.
        let result = unsafe { mctg_unpack_700a_signal_ids(word, &mut com, &mut bus, &mut chan) };
        assert_eq!(result, MctgResult::Ok);
        assert_eq!((com, bus, chan), (0x78, 0x56, 0x1234));
    }

    #[test]
    fn pack_unpack_700b() {
        let word = mctg_pack_700b_signal_ids(0x0ABC_DEF1, 5);
        assert_eq!(word, 0x5ABC_DEF1);

        let (mut serial, mut chan) = (0u32, 0u32);
        // SAFETY: all destinations are valid locals.
        let result = unsafe { mctg_unpack_700b_signal_ids(word, &mut serial, &mut chan) };
        assert_eq!(result, MctgResult::Ok);
        assert_eq!((serial, chan), (0x0ABC_DEF1, 5));
    }

    #[test]
    fn null_destination_writes_nothing() {
        let (mut com, mut chan) = (7u32, 9u32);
        // SAFETY: null is checked before any write.
        let result = unsafe {
            mctg_unpack_700a_signal_ids(0xFFFF_FFFF, &mut com, std::ptr::null_mut(), &mut chan)
        };
        assert_eq!(result, MctgResult::InvalidArgument);
        assert_eq!((com, chan), (7, 9));

        // SAFETY: null is checked before any write.
        let result =
            unsafe { mctg_unpack_700b_signal_ids(0xFFFF_FFFF, std::ptr::null_mut(), &mut chan) };
        assert_eq!(result, MctgResult::InvalidArgument);
        assert_eq!(chan, 9);
    }

    #[test]
    fn match_compares_fields() {
        let word = mctg_pack_700a_signal_ids(1, 0, 2);
        assert!(mctg_match_700a_signal_ids(1, 0, 2, word));
        assert!(!mctg_match_700a_signal_ids(1, 0, 1, word));

        let word = mctg_pack_700b_signal_ids(836_019, 1);
        assert!(mctg_match_700b_signal_ids(836_019, 1, word));
        assert!(!mctg_match_700b_signal_ids(836_019, 2, word));
    }
}
