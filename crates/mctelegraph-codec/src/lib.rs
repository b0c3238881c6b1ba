//! MultiClamp telegraph records and packed channel identifiers.
//!
//! MultiClamp Commander broadcasts the configuration of each amplifier channel
//! as a fixed-size, versioned binary record, and names channels with a 32-bit
//! word packed from their hardware identity. This crate provides:
//! - Explicit little-endian encode/decode of the v13 (256-byte) and legacy
//!   v5 (128-byte) record layouts, with forward-compatible reads of newer ones
//! - Lossless pack/unpack/match of 700A and 700B channel identifiers
//! - The registered notification names and signal/unit display tables
//!
//! Every function here is pure; only [`RecordReader`] and [`RecordWriter`]
//! touch I/O.

pub mod channel;
pub mod codec;
pub mod error;
pub mod message;
pub mod names;
pub mod reader;
pub mod record;
pub mod writer;

pub use channel::{
    channel_id_matches, decode_channel_id, encode_channel_id, ChannelId, ChannelScheme,
    MAX_700B_CHANNEL, MAX_700B_SERIAL,
};
pub use codec::{
    decode_record, decode_record_buf, decode_record_with, encode_record, encode_record_into,
    encode_record_with, Compatibility, DecodeConfig, DecodedRecord, RecordLayout, API_VERSION,
    DEFAULT_MAX_RECORD_SIZE, HEADER_SIZE, LEGACY_API_VERSION, LEGACY_RECORD_SIZE,
    MIN_RECORD_SIZE, RECORD_SIZE,
};
pub use error::{Result, TelegraphError};
pub use message::{TelegraphMessage, UnknownMessage};
pub use names::{ext_cmd_sens_units, signal_name};
pub use reader::RecordReader;
pub use record::{
    validate_record, HardwareType, OperatingMode, OutputSignal, ScaleFactorUnits,
    TelegraphRecord, LPF_BYPASS, NO_MEMBRANE_CAP, NO_SERIES_RESISTANCE,
};
pub use writer::RecordWriter;
