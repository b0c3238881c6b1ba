//! Display names for enumerated telegraph fields.
//!
//! All tables are immutable statics indexed by the on-wire selector value.

use crate::record::{HardwareType, OperatingMode};

pub(crate) const MODE_NAMES: [&str; 3] = ["V-Clamp", "I-Clamp", "I = 0"];

pub(crate) const UNIT_NAMES: [&str; 9] = [
    "V/V", "V/mV", "V/uV", "V/A", "V/mA", "V/uA", "V/nA", "V/pA", "(none)",
];

pub(crate) const HARDWARE_NAMES: [&str; 2] = ["MultiClamp 700A", "MultiClamp 700B"];

/// 700A output multiplexer, shared by every operating mode.
pub const MC700A_SIGNAL_NAMES: [&str; 11] = [
    "I_CMD_SUMMED",
    "V_CMD_SUMMED",
    "I_CMD_EXT",
    "V_CMD_EXT",
    "I_MEMBRANE",
    "V_MEMBRANE",
    "V_MEMBRANEx100",
    "I_AUX1",
    "V_AUX1",
    "I_AUX2",
    "V_AUX2",
];

/// 700B output signals in voltage clamp.
pub const MC700B_VC_SIGNAL_NAMES: [&str; 7] = [
    "Membrane Current",
    "Membrane Potential",
    "Pipette Potential",
    "100x AC Membrane Potential",
    "External Command Potential",
    "Auxiliary 1",
    "Auxiliary 2",
];

/// 700B output signals in current clamp and I = 0.
pub const MC700B_IC_SIGNAL_NAMES: [&str; 7] = [
    "Membrane Potential",
    "Membrane Current",
    "Command Current",
    "100x AC Membrane Potential",
    "External Command Current",
    "Auxiliary 1",
    "Auxiliary 2",
];

/// The signal table that applies to a hardware generation and mode.
pub fn signal_table(hardware: HardwareType, mode: OperatingMode) -> &'static [&'static str] {
    match (hardware, mode) {
        (HardwareType::Mc700A, _) => &MC700A_SIGNAL_NAMES,
        (HardwareType::Mc700B, OperatingMode::VoltageClamp) => &MC700B_VC_SIGNAL_NAMES,
        (HardwareType::Mc700B, _) => &MC700B_IC_SIGNAL_NAMES,
    }
}

/// Display name of an output signal selector, or `None` if out of range.
pub fn signal_name(
    hardware: HardwareType,
    mode: OperatingMode,
    signal: u32,
) -> Option<&'static str> {
    signal_table(hardware, mode)
        .get(usize::try_from(signal).ok()?)
        .copied()
}

/// Units of the external command sensitivity in a given mode.
pub fn ext_cmd_sens_units(mode: OperatingMode) -> &'static str {
    match mode {
        OperatingMode::VoltageClamp => "V/V",
        OperatingMode::CurrentClamp => "A/V",
        OperatingMode::CurrentClampZero => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_names_depend_on_hardware_and_mode() {
        assert_eq!(
            signal_name(HardwareType::Mc700A, OperatingMode::CurrentClamp, 5),
            Some("V_MEMBRANE")
        );
        assert_eq!(
            signal_name(HardwareType::Mc700B, OperatingMode::VoltageClamp, 0),
            Some("Membrane Current")
        );
        assert_eq!(
            signal_name(HardwareType::Mc700B, OperatingMode::CurrentClampZero, 0),
            Some("Membrane Potential")
        );
    }

    #[test]
    fn out_of_range_signal_has_no_name() {
        assert_eq!(
            signal_name(HardwareType::Mc700A, OperatingMode::VoltageClamp, 11),
            None
        );
        assert_eq!(
            signal_name(HardwareType::Mc700B, OperatingMode::CurrentClamp, u32::MAX),
            None
        );
    }

    #[test]
    fn ext_cmd_units_follow_mode() {
        assert_eq!(ext_cmd_sens_units(OperatingMode::VoltageClamp), "V/V");
        assert_eq!(ext_cmd_sens_units(OperatingMode::CurrentClamp), "A/V");
        assert!(ext_cmd_sens_units(OperatingMode::CurrentClampZero).is_empty());
    }
}
