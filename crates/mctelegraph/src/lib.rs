//! MultiClamp telegraph records and channel identifiers.
//!
//! mctelegraph encodes and decodes the fixed-size configuration records that
//! MultiClamp Commander broadcasts for each amplifier channel, and packs the
//! 32-bit channel identifiers carried by the telegraph notifications.
//!
//! # Crate Structure
//!
//! - [`codec`]: record layouts, channel ids, notification names and record streams
//!
//! The `cli` feature builds the `mctelegraph` inspection binary.

/// Re-export codec types.
pub mod codec {
    pub use mctelegraph_codec::*;
}

pub use mctelegraph_codec::{
    decode_record, encode_record, ChannelId, ChannelScheme, DecodedRecord, RecordReader,
    RecordWriter, TelegraphError, TelegraphMessage, TelegraphRecord,
};
