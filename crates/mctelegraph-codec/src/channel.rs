//! Packed channel identifiers.
//!
//! MultiClamp Commander identifies a physical amplifier channel with a single
//! 32-bit word carried in notification payloads. The layout depends on the
//! hardware generation:
//!
//! ```text
//! 700A  bits 31..16 channel   bits 15..8 axobus   bits 7..0 com port
//! 700B  bits 31..28 channel   bits 27..0 serial number
//! ```
//!
//! Fields wider than their slot are masked, never rejected. Senders do not
//! guarantee unused bits are zero, so identity checks decode the word and
//! compare fields instead of comparing raw words.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const COM_PORT_MASK: u32 = 0xFF;
const AXOBUS_SHIFT: u32 = 8;
const AXOBUS_MASK: u32 = 0xFF;
const CHANNEL_700A_SHIFT: u32 = 16;
const CHANNEL_700A_MASK: u32 = 0xFFFF;

const SERIAL_MASK: u32 = 0x0FFF_FFFF;
const CHANNEL_700B_SHIFT: u32 = 28;
const CHANNEL_700B_MASK: u32 = 0xF;

/// Largest serial number representable in a 700B identifier.
pub const MAX_700B_SERIAL: u32 = SERIAL_MASK;

/// Largest channel representable in a 700B identifier.
pub const MAX_700B_CHANNEL: u32 = CHANNEL_700B_MASK;

/// Packing scheme for a channel identifier word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChannelScheme {
    /// COM port, AxoBus device, channel.
    Mc700A,
    /// Device serial number, channel.
    Mc700B,
}

impl ChannelScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelScheme::Mc700A => "700a",
            ChannelScheme::Mc700B => "700b",
        }
    }
}

/// Identity of one physical amplifier channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "scheme", rename_all = "lowercase"))]
pub enum ChannelId {
    Mc700A {
        com_port_id: u32,
        axobus_id: u32,
        channel_id: u32,
    },
    Mc700B {
        serial_number: u32,
        channel_id: u32,
    },
}

impl ChannelId {
    /// The packing scheme this identifier uses.
    pub fn scheme(&self) -> ChannelScheme {
        match self {
            ChannelId::Mc700A { .. } => ChannelScheme::Mc700A,
            ChannelId::Mc700B { .. } => ChannelScheme::Mc700B,
        }
    }

    /// Pack into a transport word. See [`encode_channel_id`].
    pub fn pack(&self) -> u32 {
        encode_channel_id(self)
    }

    /// Unpack a transport word. See [`decode_channel_id`].
    pub fn unpack(scheme: ChannelScheme, word: u32) -> Self {
        decode_channel_id(scheme, word)
    }

    /// See [`channel_id_matches`].
    pub fn matches(&self, word: u32) -> bool {
        channel_id_matches(self, word)
    }
}

/// Pack a channel identifier into a 32-bit word.
///
/// Each field is masked to its slot width, so out-of-range inputs alias
/// silently onto in-range words.
pub fn encode_channel_id(id: &ChannelId) -> u32 {
    match *id {
        ChannelId::Mc700A {
            com_port_id,
            axobus_id,
            channel_id,
        } => {
            (com_port_id & COM_PORT_MASK)
                | ((axobus_id & AXOBUS_MASK) << AXOBUS_SHIFT)
                | ((channel_id & CHANNEL_700A_MASK) << CHANNEL_700A_SHIFT)
        }
        ChannelId::Mc700B {
            serial_number,
            channel_id,
        } => {
            (serial_number & SERIAL_MASK)
                | ((channel_id & CHANNEL_700B_MASK) << CHANNEL_700B_SHIFT)
        }
    }
}

/// Unpack a 32-bit word using the given scheme. Every word decodes.
pub fn decode_channel_id(scheme: ChannelScheme, word: u32) -> ChannelId {
    match scheme {
        ChannelScheme::Mc700A => ChannelId::Mc700A {
            com_port_id: word & COM_PORT_MASK,
            axobus_id: (word >> AXOBUS_SHIFT) & AXOBUS_MASK,
            channel_id: (word >> CHANNEL_700A_SHIFT) & CHANNEL_700A_MASK,
        },
        ChannelScheme::Mc700B => ChannelId::Mc700B {
            serial_number: word & SERIAL_MASK,
            channel_id: (word >> CHANNEL_700B_SHIFT) & CHANNEL_700B_MASK,
        },
    }
}

/// Returns true if `word`, decoded with the scheme of `id`, names the same
/// channel field-for-field.
pub fn channel_id_matches(id: &ChannelId, word: u32) -> bool {
    decode_channel_id(id.scheme(), word) == *id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mc700a(com_port_id: u32, axobus_id: u32, channel_id: u32) -> ChannelId {
        ChannelId::Mc700A {
            com_port_id,
            axobus_id,
            channel_id,
        }
    }

    fn mc700b(serial_number: u32, channel_id: u32) -> ChannelId {
        ChannelId::Mc700B {
            serial_number,
            channel_id,
        }
    }

    #[test]
    fn packs_700a_fields_by_byte() {
        assert_eq!(encode_channel_id(&mc700a(0x78, 0x56, 0x1234)), 0x1234_5678);
    }

    #[test]
    fn packs_700b_channel_into_high_nibble() {
        assert_eq!(encode_channel_id(&mc700b(0x0ABC_DEF1, 5)), 0x5ABC_DEF1);
    }

    #[test]
    fn roundtrips_edge_values() {
        let ids = [
            mc700a(0, 0, 0),
            mc700a(1, 0, 1),
            mc700a(0xFF, 0xFF, 0xFFFF),
            mc700b(0, 0),
            mc700b(MAX_700B_SERIAL, MAX_700B_CHANNEL),
            mc700b(836_019, 2),
        ];

        for id in ids {
            assert_eq!(decode_channel_id(id.scheme(), id.pack()), id);
        }
    }

    #[test]
    fn out_of_range_fields_are_masked() {
        assert_eq!(encode_channel_id(&mc700a(0x1FF, 0, 0)), 0xFF);
        assert_eq!(
            encode_channel_id(&mc700a(1, 0, 0x1_0002)),
            encode_channel_id(&mc700a(1, 0, 2))
        );
        assert_eq!(encode_channel_id(&mc700b(0x1000_0001, 0)), 1);
        assert_eq!(encode_channel_id(&mc700b(7, 0x12)), 0x2000_0007);
    }

    #[test]
    fn different_fields_do_not_match() {
        let word = mc700a(1, 0, 1).pack();
        assert!(mc700a(1, 0, 1).matches(word));
        assert!(!mc700a(2, 0, 1).matches(word));
        assert!(!mc700a(1, 1, 1).matches(word));
        assert!(!mc700a(1, 0, 2).matches(word));

        let word = mc700b(836_019, 1).pack();
        assert!(mc700b(836_019, 1).matches(word));
        assert!(!mc700b(836_019, 2).matches(word));
        assert!(!mc700b(836_018, 1).matches(word));
    }

    #[test]
    fn out_of_range_id_never_matches_its_own_word() {
        let id = mc700a(0x100, 0, 1);
        assert!(!channel_id_matches(&id, id.pack()));
    }

    #[test]
    fn every_word_decodes() {
        for word in [0u32, 1, 0x8000_0000, u32::MAX] {
            let _ = decode_channel_id(ChannelScheme::Mc700A, word);
            let _ = decode_channel_id(ChannelScheme::Mc700B, word);
        }
        assert_eq!(
            decode_channel_id(ChannelScheme::Mc700B, u32::MAX),
            mc700b(MAX_700B_SERIAL, MAX_700B_CHANNEL)
        );
    }
}
