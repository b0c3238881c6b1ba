use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, TelegraphError};
use crate::names::signal_table;
use crate::record::{
    validate_record, HardwareType, OperatingMode, OutputSignal, ScaleFactorUnits,
    TelegraphRecord, NO_SERIES_RESISTANCE, TEXT_SLOT_SIZE,
};

/// Telegraph API version written by this codec.
pub const API_VERSION: u32 = 13;

/// Size of a current-version record on the wire.
pub const RECORD_SIZE: usize = 256;

/// Oldest telegraph API version with a known layout.
pub const LEGACY_API_VERSION: u32 = 5;

/// Size of a legacy record on the wire.
pub const LEGACY_RECORD_SIZE: usize = 128;

/// No known layout is shorter than this.
pub const MIN_RECORD_SIZE: usize = LEGACY_RECORD_SIZE;

/// Version (4) + record size (4).
pub const HEADER_SIZE: usize = 8;

/// Default upper bound for streamed record sizes: 64 KiB.
pub const DEFAULT_MAX_RECORD_SIZE: usize = 64 * 1024;

/// A known on-wire record shape.
///
/// Both layouts share the first 72 bytes. Everything after the known fields is
/// zero padding up to the record size.
///
/// ```text
///   0 version            4 record size        8 com port        12 axobus
///  16 channel           20 mode              24 scaled signal   28 alpha (f64)
///  36 scale factor      44 units             48 LPF cutoff      56 membrane cap
///  64 ext cmd sens    ──── end of v5 fields (72), padded to 128 ────
///  72 raw signal        76 raw scale factor  84 raw units       88 hardware type
///  92 secondary alpha  100 secondary LPF    108 app version    124 firmware version
/// 140 DSP version      156 serial number    172 series resistance
///                     ──── end of v13 fields (180), padded to 256 ────
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// API version 5, 700A only.
    Legacy,
    /// API version 13, 700A and 700B.
    Current,
}

impl RecordLayout {
    pub fn version(self) -> u32 {
        match self {
            RecordLayout::Legacy => LEGACY_API_VERSION,
            RecordLayout::Current => API_VERSION,
        }
    }

    pub fn record_size(self) -> usize {
        match self {
            RecordLayout::Legacy => LEGACY_RECORD_SIZE,
            RecordLayout::Current => RECORD_SIZE,
        }
    }

    /// Offset one past the last field this layout defines.
    pub fn fields_end(self) -> usize {
        match self {
            RecordLayout::Legacy => 72,
            RecordLayout::Current => 180,
        }
    }
}

/// How a decoded record relates to the layouts this codec knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// Written by the current API version.
    Exact,
    /// Written by the legacy API version.
    Legacy,
    /// Written by a newer API version; only known fields were read.
    Forward,
}

/// A record together with the header it arrived with.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub version: u32,
    pub record_size: u32,
    pub layout: RecordLayout,
    pub compatibility: Compatibility,
    pub record: TelegraphRecord,
}

impl DecodedRecord {
    /// Values from a newer sender may carry meaning this codec does not know.
    pub fn is_provisional(&self) -> bool {
        self.compatibility == Compatibility::Forward
    }
}

/// Configuration for record decoding.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Accept API version 5 records.
    pub accept_legacy: bool,
    /// Accept records from newer API versions that still carry every known field.
    pub accept_forward: bool,
    /// Maximum record size accepted from a stream.
    pub max_record_size: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            accept_legacy: true,
            accept_forward: true,
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
        }
    }
}

/// Encode a record in the current layout and append it to `dst`.
pub fn encode_record(record: &TelegraphRecord, dst: &mut BytesMut) -> Result<()> {
    encode_record_with(record, RecordLayout::Current, dst)
}

/// Encode a record in an explicit layout and append it to `dst`.
///
/// The record is validated first; on error nothing is appended. The legacy
/// layout drops the secondary output, hardware identity and series resistance,
/// so only 700A records can be written in it.
pub fn encode_record_with(
    record: &TelegraphRecord,
    layout: RecordLayout,
    dst: &mut BytesMut,
) -> Result<()> {
    validate_record(record)?;
    if layout == RecordLayout::Legacy && record.hardware_type != HardwareType::Mc700A {
        return Err(TelegraphError::InvalidField {
            field: "hardware_type",
            value: record.hardware_type.as_u32(),
        });
    }

    let size = layout.record_size();
    let start = dst.len();
    dst.reserve(size);

    dst.put_u32_le(layout.version());
    dst.put_u32_le(size as u32);
    dst.put_u32_le(record.com_port_id);
    dst.put_u32_le(record.axobus_id);
    dst.put_u32_le(record.channel_id);
    dst.put_u32_le(record.operating_mode.as_u32());
    dst.put_u32_le(record.primary.signal);
    dst.put_f64_le(record.primary.alpha);
    dst.put_f64_le(record.primary.scale_factor);
    dst.put_u32_le(record.primary.units.as_u32());
    dst.put_f64_le(record.primary.lpf_cutoff);
    dst.put_f64_le(record.membrane_cap);
    dst.put_f64_le(record.ext_cmd_sens);

    if layout == RecordLayout::Current {
        let secondary = record.secondary.unwrap_or_default();
        dst.put_u32_le(secondary.signal);
        dst.put_f64_le(secondary.scale_factor);
        dst.put_u32_le(secondary.units.as_u32());
        dst.put_u32_le(record.hardware_type.as_u32());
        dst.put_f64_le(secondary.alpha);
        dst.put_f64_le(secondary.lpf_cutoff);
        put_text(dst, &record.app_version);
        put_text(dst, &record.firmware_version);
        put_text(dst, &record.dsp_version);
        put_text(dst, &record.serial_number);
        dst.put_f64_le(record.series_resistance);
    }

    debug_assert_eq!(dst.len() - start, layout.fields_end());
    dst.put_bytes(0, size - layout.fields_end());
    Ok(())
}

/// Encode a current-layout record into a caller buffer, returning the byte count.
///
/// A buffer shorter than [`RECORD_SIZE`] is rejected before anything is written.
pub fn encode_record_into(record: &TelegraphRecord, out: &mut [u8]) -> Result<usize> {
    if out.len() < RECORD_SIZE {
        return Err(TelegraphError::InvalidArgument(
            "output buffer is smaller than a telegraph record",
        ));
    }

    let mut buf = BytesMut::with_capacity(RECORD_SIZE);
    encode_record(record, &mut buf)?;
    out[..buf.len()].copy_from_slice(&buf);
    Ok(buf.len())
}

/// Decode one record with default configuration.
pub fn decode_record(src: &[u8]) -> Result<DecodedRecord> {
    decode_record_with(src, &DecodeConfig::default())
}

/// Decode one record from the start of `src`.
///
/// Reads the version and record size first, picks the matching layout, and
/// never reads past the declared record size or the layout's known fields.
pub fn decode_record_with(src: &[u8], config: &DecodeConfig) -> Result<DecodedRecord> {
    if src.len() < MIN_RECORD_SIZE {
        return Err(TelegraphError::TruncatedRecord {
            needed: MIN_RECORD_SIZE,
            available: src.len(),
        });
    }

    let mut header = &src[..HEADER_SIZE];
    let version = header.get_u32_le();
    let record_size = header.get_u32_le();

    if record_size as usize > src.len() {
        return Err(TelegraphError::TruncatedRecord {
            needed: record_size as usize,
            available: src.len(),
        });
    }

    let (layout, compatibility) = select_layout(version, record_size, config)?;
    // Known versions declare their full size; newer ones must cover the known fields.
    let needed = match compatibility {
        Compatibility::Forward => layout.fields_end(),
        Compatibility::Exact | Compatibility::Legacy => layout.record_size(),
    };
    if (record_size as usize) < needed {
        return Err(TelegraphError::TruncatedRecord {
            needed,
            available: record_size as usize,
        });
    }

    let record = read_fields(&src[HEADER_SIZE..layout.fields_end()], layout)?;

    Ok(DecodedRecord {
        version,
        record_size,
        layout,
        compatibility,
        record,
    })
}

/// Decode one record from a stream buffer.
///
/// Returns `Ok(None)` if the buffer doesn't hold a complete record yet. On
/// success, consumes exactly the declared record size from the buffer.
pub fn decode_record_buf(
    src: &mut BytesMut,
    config: &DecodeConfig,
) -> Result<Option<DecodedRecord>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let record_size = u32::from_le_bytes([src[4], src[5], src[6], src[7]]) as usize;

    if record_size < MIN_RECORD_SIZE {
        return Err(TelegraphError::TruncatedRecord {
            needed: MIN_RECORD_SIZE,
            available: record_size,
        });
    }
    if record_size > config.max_record_size {
        return Err(TelegraphError::RecordTooLarge {
            size: record_size,
            max: config.max_record_size,
        });
    }
    if src.len() < record_size {
        return Ok(None); // Need more data
    }

    let bytes = src.split_to(record_size).freeze();
    decode_record_with(&bytes, config).map(Some)
}

fn select_layout(
    version: u32,
    record_size: u32,
    config: &DecodeConfig,
) -> Result<(RecordLayout, Compatibility)> {
    match version {
        API_VERSION => Ok((RecordLayout::Current, Compatibility::Exact)),
        LEGACY_API_VERSION if config.accept_legacy => {
            Ok((RecordLayout::Legacy, Compatibility::Legacy))
        }
        v if v > API_VERSION
            && config.accept_forward
            && record_size as usize >= RecordLayout::Current.fields_end() =>
        {
            Ok((RecordLayout::Current, Compatibility::Forward))
        }
        _ => Err(TelegraphError::UnsupportedVersion {
            version,
            record_size,
        }),
    }
}

fn read_fields(mut buf: &[u8], layout: RecordLayout) -> Result<TelegraphRecord> {
    let com_port_id = buf.get_u32_le();
    let axobus_id = buf.get_u32_le();
    let channel_id = buf.get_u32_le();
    let raw_mode = buf.get_u32_le();
    let operating_mode = OperatingMode::from_u32(raw_mode).ok_or(TelegraphError::InvalidField {
        field: "operating_mode",
        value: raw_mode,
    })?;

    let primary_signal = buf.get_u32_le();
    let primary_alpha = buf.get_f64_le();
    let primary_scale = buf.get_f64_le();
    let primary_units = read_units(&mut buf, "primary.units")?;
    let primary_lpf = buf.get_f64_le();
    let membrane_cap = buf.get_f64_le();
    let ext_cmd_sens = buf.get_f64_le();

    let mut record = TelegraphRecord {
        com_port_id,
        axobus_id,
        channel_id,
        operating_mode,
        primary: OutputSignal {
            signal: primary_signal,
            alpha: primary_alpha,
            scale_factor: primary_scale,
            units: primary_units,
            lpf_cutoff: primary_lpf,
        },
        membrane_cap,
        ext_cmd_sens,
        secondary: None,
        hardware_type: HardwareType::Mc700A,
        app_version: String::new(),
        firmware_version: String::new(),
        dsp_version: String::new(),
        serial_number: String::new(),
        series_resistance: NO_SERIES_RESISTANCE,
    };

    if layout == RecordLayout::Current {
        let signal = buf.get_u32_le();
        let scale_factor = buf.get_f64_le();
        let units = read_units(&mut buf, "secondary.units")?;
        let raw_hardware = buf.get_u32_le();
        record.hardware_type =
            HardwareType::from_u32(raw_hardware).ok_or(TelegraphError::InvalidField {
                field: "hardware_type",
                value: raw_hardware,
            })?;
        let alpha = buf.get_f64_le();
        let lpf_cutoff = buf.get_f64_le();
        record.secondary = Some(OutputSignal {
            signal,
            alpha,
            scale_factor,
            units,
            lpf_cutoff,
        });
        record.app_version = get_text(&mut buf);
        record.firmware_version = get_text(&mut buf);
        record.dsp_version = get_text(&mut buf);
        record.serial_number = get_text(&mut buf);
        record.series_resistance = buf.get_f64_le();
    }

    let table = signal_table(record.hardware_type, record.operating_mode);
    if record.primary.signal as usize >= table.len() {
        return Err(TelegraphError::InvalidField {
            field: "primary.signal",
            value: record.primary.signal,
        });
    }
    if let Some(secondary) = &record.secondary {
        if secondary.signal as usize >= table.len() {
            return Err(TelegraphError::InvalidField {
                field: "secondary.signal",
                value: secondary.signal,
            });
        }
    }

    Ok(record)
}

fn read_units(buf: &mut &[u8], field: &'static str) -> Result<ScaleFactorUnits> {
    let value = buf.get_u32_le();
    ScaleFactorUnits::from_u32(value).ok_or(TelegraphError::InvalidField { field, value })
}

fn put_text(dst: &mut BytesMut, text: &str) {
    dst.put_slice(text.as_bytes());
    dst.put_bytes(0, TEXT_SLOT_SIZE - text.len());
}

/// Read a text slot so the result always passes `validate_record` again:
/// at most 15 bytes, stopping at the first NUL, with each byte that is not
/// valid UTF-8 replaced by `?`.
fn get_text(buf: &mut &[u8]) -> String {
    let slot = &buf[..TEXT_SLOT_SIZE - 1];
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());

    let mut text = String::with_capacity(end);
    for chunk in slot[..end].utf8_chunks() {
        text.push_str(chunk.valid());
        text.extend(chunk.invalid().iter().map(|_| '?'));
    }

    buf.advance(TEXT_SLOT_SIZE);
    text
}
