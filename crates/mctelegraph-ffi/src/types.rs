use std::os::raw::c_char;

use mctelegraph_codec::{
    DecodedRecord, HardwareType, OperatingMode, OutputSignal, ScaleFactorUnits, TelegraphError,
    TelegraphRecord,
};

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MctgResult {
    Ok = 0,
    InvalidArgument = 1,
    TruncatedRecord = 2,
    UnsupportedVersion = 3,
    SentinelViolation = 4,
    InvalidField = 5,
    Internal = 99,
}

pub const MCTG_OK: MctgResult = MctgResult::Ok;
pub const MCTG_ERR_INVALID_ARGUMENT: MctgResult = MctgResult::InvalidArgument;
pub const MCTG_ERR_TRUNCATED_RECORD: MctgResult = MctgResult::TruncatedRecord;
pub const MCTG_ERR_UNSUPPORTED_VERSION: MctgResult = MctgResult::UnsupportedVersion;
pub const MCTG_ERR_SENTINEL_VIOLATION: MctgResult = MctgResult::SentinelViolation;
pub const MCTG_ERR_INVALID_FIELD: MctgResult = MctgResult::InvalidField;
pub const MCTG_ERR_INTERNAL: MctgResult = MctgResult::Internal;

pub const MCTG_API_VERSION: u32 = mctelegraph_codec::API_VERSION;
pub const MCTG_RECORD_SIZE: usize = mctelegraph_codec::RECORD_SIZE;

pub const MCTG_TEXT_SIZE: usize = 16;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct MctgOutputSignal {
    pub signal: u32,
    pub alpha: f64,
    pub scale_factor: f64,
    pub units: u32,
    pub lpf_cutoff: f64,
}

/// Flat C view of a telegraph record.
///
/// This is an API struct, not the wire image; use `mctg_encode_record` to
/// produce wire bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MctgTelegraphData {
    pub version: u32,
    pub record_size: u32,
    pub com_port_id: u32,
    pub axobus_id: u32,
    pub channel_id: u32,
    pub operating_mode: u32,
    pub primary: MctgOutputSignal,
    pub membrane_cap: f64,
    pub ext_cmd_sens: f64,
    pub has_secondary: bool,
    pub secondary: MctgOutputSignal,
    pub hardware_type: u32,
    pub app_version: [c_char; MCTG_TEXT_SIZE],
    pub firmware_version: [c_char; MCTG_TEXT_SIZE],
    pub dsp_version: [c_char; MCTG_TEXT_SIZE],
    pub serial_number: [c_char; MCTG_TEXT_SIZE],
    pub series_resistance: f64,
    /// Set when the record came from a newer API version.
    pub provisional: bool,
}

impl Default for MctgTelegraphData {
    fn default() -> Self {
        Self::from_record(&TelegraphRecord::default())
    }
}

impl MctgTelegraphData {
    pub(crate) fn from_record(record: &TelegraphRecord) -> Self {
        Self {
            version: mctelegraph_codec::API_VERSION,
            record_size: mctelegraph_codec::RECORD_SIZE as u32,
            com_port_id: record.com_port_id,
            axobus_id: record.axobus_id,
            channel_id: record.channel_id,
            operating_mode: record.operating_mode.as_u32(),
            primary: signal_to_c(&record.primary),
            membrane_cap: record.membrane_cap,
            ext_cmd_sens: record.ext_cmd_sens,
            has_secondary: record.secondary.is_some(),
            secondary: record
                .secondary
                .as_ref()
                .map(signal_to_c)
                .unwrap_or_default(),
            hardware_type: record.hardware_type.as_u32(),
            app_version: text_to_c(&record.app_version),
            firmware_version: text_to_c(&record.firmware_version),
            dsp_version: text_to_c(&record.dsp_version),
            serial_number: text_to_c(&record.serial_number),
            series_resistance: record.series_resistance,
            provisional: false,
        }
    }

    pub(crate) fn from_decoded(decoded: &DecodedRecord) -> Self {
        Self {
            version: decoded.version,
            record_size: decoded.record_size,
            provisional: decoded.is_provisional(),
            ..Self::from_record(&decoded.record)
        }
    }

    /// Convert back to a record; `version`, `record_size` and `provisional`
    /// are ignored.
    pub(crate) fn to_record(&self) -> Result<TelegraphRecord, TelegraphError> {
        let operating_mode = OperatingMode::from_u32(self.operating_mode).ok_or(
            TelegraphError::InvalidField {
                field: "operating_mode",
                value: self.operating_mode,
            },
        )?;
        let hardware_type =
            HardwareType::from_u32(self.hardware_type).ok_or(TelegraphError::InvalidField {
                field: "hardware_type",
                value: self.hardware_type,
            })?;

        Ok(TelegraphRecord {
            com_port_id: self.com_port_id,
            axobus_id: self.axobus_id,
            channel_id: self.channel_id,
            operating_mode,
            primary: signal_from_c(&self.primary, "primary.units")?,
            membrane_cap: self.membrane_cap,
            ext_cmd_sens: self.ext_cmd_sens,
            secondary: if self.has_secondary {
                Some(signal_from_c(&self.secondary, "secondary.units")?)
            } else {
                None
            },
            hardware_type,
            app_version: text_from_c(&self.app_version, "app_version")?,
            firmware_version: text_from_c(&self.firmware_version, "firmware_version")?,
            dsp_version: text_from_c(&self.dsp_version, "dsp_version")?,
            serial_number: text_from_c(&self.serial_number, "serial_number")?,
            series_resistance: self.series_resistance,
        })
    }
}

fn signal_to_c(signal: &OutputSignal) -> MctgOutputSignal {
    MctgOutputSignal {
        signal: signal.signal,
        alpha: signal.alpha,
        scale_factor: signal.scale_factor,
        units: signal.units.as_u32(),
        lpf_cutoff: signal.lpf_cutoff,
    }
}

fn signal_from_c(
    signal: &MctgOutputSignal,
    field: &'static str,
) -> Result<OutputSignal, TelegraphError> {
    let units = ScaleFactorUnits::from_u32(signal.units).ok_or(TelegraphError::InvalidField {
        field,
        value: signal.units,
    })?;
    Ok(OutputSignal {
        signal: signal.signal,
        alpha: signal.alpha,
        scale_factor: signal.scale_factor,
        units,
        lpf_cutoff: signal.lpf_cutoff,
    })
}

// Text longer than the slot is cut; decoded records never exceed it.
fn text_to_c(text: &str) -> [c_char; MCTG_TEXT_SIZE] {
    let mut out = [0 as c_char; MCTG_TEXT_SIZE];
    for (dst, src) in out.iter_mut().zip(text.bytes().take(MCTG_TEXT_SIZE - 1)) {
        *dst = src as c_char;
    }
    out
}

fn text_from_c(
    slot: &[c_char; MCTG_TEXT_SIZE],
    field: &'static str,
) -> Result<String, TelegraphError> {
    let bytes: Vec<u8> = slot.iter().map(|&c| c as u8).collect();
    let end = bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or(TelegraphError::FieldTooLong {
            field,
            len: MCTG_TEXT_SIZE,
            max: MCTG_TEXT_SIZE - 1,
        })?;
    Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_survives_c_view() {
        let record = TelegraphRecord {
            channel_id: 2,
            serial_number: "00836019".to_string(),
            app_version: "2.2.2.2".to_string(),
            secondary: None,
            ..TelegraphRecord::default()
        };
        let view = MctgTelegraphData::from_record(&record);
        assert!(!view.has_secondary);
        assert_eq!(view.to_record().unwrap(), record);
    }

    #[test]
    fn unterminated_text_is_rejected() {
        let mut view = MctgTelegraphData::default();
        view.dsp_version = [b'7' as c_char; MCTG_TEXT_SIZE];
        assert!(matches!(
            view.to_record(),
            Err(TelegraphError::FieldTooLong {
                field: "dsp_version",
                ..
            })
        ));
    }

    #[test]
    fn invalid_selectors_are_rejected() {
        let mut view = MctgTelegraphData::default();
        view.hardware_type = 9;
        assert!(matches!(
            view.to_record(),
            Err(TelegraphError::InvalidField {
                field: "hardware_type",
                value: 9,
            })
        ));
    }
}
