use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channel::ChannelId;
use crate::error::{Result, TelegraphError};
use crate::names::{signal_table, HARDWARE_NAMES, MODE_NAMES, UNIT_NAMES};

/// Membrane capacitance value when compensation data is not valid.
pub const NO_MEMBRANE_CAP: f64 = 0.0;

/// Series resistance value when compensation data is not valid.
pub const NO_SERIES_RESISTANCE: f64 = 0.0;

/// Low-pass filter cutoff reported when the filter is bypassed (Hz).
pub const LPF_BYPASS: f64 = 100_000.0;

/// Capacity of each fixed-width text slot, including the NUL terminator.
pub const TEXT_SLOT_SIZE: usize = 16;

/// Amplifier clamp mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u32)]
pub enum OperatingMode {
    #[default]
    VoltageClamp = 0,
    CurrentClamp = 1,
    CurrentClampZero = 2,
}

impl OperatingMode {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(OperatingMode::VoltageClamp),
            1 => Some(OperatingMode::CurrentClamp),
            2 => Some(OperatingMode::CurrentClampZero),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        MODE_NAMES[self as usize]
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Units of an output scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u32)]
pub enum ScaleFactorUnits {
    #[default]
    VoltsPerVolt = 0,
    VoltsPerMillivolt = 1,
    VoltsPerMicrovolt = 2,
    VoltsPerAmp = 3,
    VoltsPerMilliamp = 4,
    VoltsPerMicroamp = 5,
    VoltsPerNanoamp = 6,
    VoltsPerPicoamp = 7,
    None = 8,
}

impl ScaleFactorUnits {
    pub fn from_u32(v: u32) -> Option<Self> {
        Some(match v {
            0 => ScaleFactorUnits::VoltsPerVolt,
            1 => ScaleFactorUnits::VoltsPerMillivolt,
            2 => ScaleFactorUnits::VoltsPerMicrovolt,
            3 => ScaleFactorUnits::VoltsPerAmp,
            4 => ScaleFactorUnits::VoltsPerMilliamp,
            5 => ScaleFactorUnits::VoltsPerMicroamp,
            6 => ScaleFactorUnits::VoltsPerNanoamp,
            7 => ScaleFactorUnits::VoltsPerPicoamp,
            8 => ScaleFactorUnits::None,
            _ => return None,
        })
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        UNIT_NAMES[self as usize]
    }
}

impl fmt::Display for ScaleFactorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Amplifier hardware generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum HardwareType {
    #[cfg_attr(feature = "serde", serde(rename = "700a"))]
    Mc700A = 0,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "700b"))]
    Mc700B = 1,
}

impl HardwareType {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(HardwareType::Mc700A),
            1 => Some(HardwareType::Mc700B),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        HARDWARE_NAMES[self as usize]
    }
}

impl fmt::Display for HardwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One amplifier output as described by the telegraph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OutputSignal {
    /// Signal selector; index into the hardware's signal table.
    pub signal: u32,
    /// Dimensionless output gain.
    pub alpha: f64,
    pub scale_factor: f64,
    pub units: ScaleFactorUnits,
    /// Low-pass filter cutoff in Hz, or [`LPF_BYPASS`].
    pub lpf_cutoff: f64,
}

/// One amplifier channel's configuration at the moment of broadcast.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TelegraphRecord {
    /// 1-based serial port (700A).
    pub com_port_id: u32,
    /// 0-based device number on the AxoBus (700A).
    pub axobus_id: u32,
    /// 1-based amplifier channel.
    pub channel_id: u32,
    pub operating_mode: OperatingMode,
    /// Scaled (primary) output.
    pub primary: OutputSignal,
    /// Membrane capacitance in farads, or [`NO_MEMBRANE_CAP`].
    ///
    /// Only meaningful in voltage clamp with whole-cell compensation enabled
    /// and the feedback resistor outside its two highest ranges.
    pub membrane_cap: f64,
    /// External command sensitivity: V/V in voltage clamp, A/V in current
    /// clamp, zero in I = 0.
    pub ext_cmd_sens: f64,
    /// Raw (secondary) output. Absent from legacy records.
    pub secondary: Option<OutputSignal>,
    pub hardware_type: HardwareType,
    pub app_version: String,
    pub firmware_version: String,
    pub dsp_version: String,
    pub serial_number: String,
    /// Series resistance in ohms, or [`NO_SERIES_RESISTANCE`]. Same validity
    /// conditions as `membrane_cap`.
    pub series_resistance: f64,
}

impl Default for TelegraphRecord {
    fn default() -> Self {
        Self {
            com_port_id: 0,
            axobus_id: 0,
            channel_id: 0,
            operating_mode: OperatingMode::VoltageClamp,
            primary: OutputSignal::default(),
            membrane_cap: NO_MEMBRANE_CAP,
            ext_cmd_sens: 0.0,
            secondary: Some(OutputSignal::default()),
            hardware_type: HardwareType::Mc700B,
            app_version: String::new(),
            firmware_version: String::new(),
            dsp_version: String::new(),
            serial_number: String::new(),
            series_resistance: NO_SERIES_RESISTANCE,
        }
    }
}

impl TelegraphRecord {
    /// Packed identity of the channel that produced this record.
    ///
    /// 700B records need a numeric serial number; `None` otherwise.
    pub fn channel_identifier(&self) -> Option<ChannelId> {
        match self.hardware_type {
            HardwareType::Mc700A => Some(ChannelId::Mc700A {
                com_port_id: self.com_port_id,
                axobus_id: self.axobus_id,
                channel_id: self.channel_id,
            }),
            HardwareType::Mc700B => {
                let serial_number = self.serial_number.trim().parse::<u32>().ok()?;
                Some(ChannelId::Mc700B {
                    serial_number,
                    channel_id: self.channel_id,
                })
            }
        }
    }

    /// Display name of the primary output signal.
    pub fn primary_signal_name(&self) -> Option<&'static str> {
        crate::names::signal_name(self.hardware_type, self.operating_mode, self.primary.signal)
    }

    /// Display name of the secondary output signal.
    pub fn secondary_signal_name(&self) -> Option<&'static str> {
        let secondary = self.secondary.as_ref()?;
        crate::names::signal_name(self.hardware_type, self.operating_mode, secondary.signal)
    }
}

/// Check the producer-side contract of a record before it is encoded.
pub fn validate_record(record: &TelegraphRecord) -> Result<()> {
    let mode = record.operating_mode;

    if mode != OperatingMode::VoltageClamp {
        if record.membrane_cap != NO_MEMBRANE_CAP {
            return Err(TelegraphError::SentinelViolation {
                field: "membrane_cap",
                mode,
            });
        }
        if record.series_resistance != NO_SERIES_RESISTANCE {
            return Err(TelegraphError::SentinelViolation {
                field: "series_resistance",
                mode,
            });
        }
    }

    if mode == OperatingMode::CurrentClampZero && record.ext_cmd_sens != 0.0 {
        return Err(TelegraphError::SentinelViolation {
            field: "ext_cmd_sens",
            mode,
        });
    }

    let table = signal_table(record.hardware_type, mode);
    check_signal("primary.signal", record.primary.signal, table.len())?;
    if let Some(secondary) = &record.secondary {
        check_signal("secondary.signal", secondary.signal, table.len())?;
    }

    check_text("app_version", &record.app_version)?;
    check_text("firmware_version", &record.firmware_version)?;
    check_text("dsp_version", &record.dsp_version)?;
    check_text("serial_number", &record.serial_number)?;

    Ok(())
}

fn check_signal(field: &'static str, value: u32, len: usize) -> Result<()> {
    if (value as usize) < len {
        Ok(())
    } else {
        Err(TelegraphError::InvalidField { field, value })
    }
}

fn check_text(field: &'static str, value: &str) -> Result<()> {
    let max = TEXT_SLOT_SIZE - 1;
    if value.len() > max || value.contains('\0') {
        return Err(TelegraphError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}
