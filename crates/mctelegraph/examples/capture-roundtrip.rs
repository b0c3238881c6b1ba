//! Capture round-trip example: writes a mixed-version capture and reads it back.
//!
//! Run with:
//!   cargo run --example capture-roundtrip

use std::io::Cursor;

use mctelegraph::codec::{
    ChannelId, HardwareType, OperatingMode, OutputSignal, RecordLayout, RecordReader,
    RecordWriter, ScaleFactorUnits, TelegraphRecord, LPF_BYPASS,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let voltage_clamp = TelegraphRecord {
        channel_id: 1,
        hardware_type: HardwareType::Mc700B,
        serial_number: "00836019".to_string(),
        primary: OutputSignal {
            signal: 0,
            alpha: 1.0,
            scale_factor: 0.5,
            units: ScaleFactorUnits::VoltsPerNanoamp,
            lpf_cutoff: 10_000.0,
        },
        membrane_cap: 3.3e-11,
        series_resistance: 1.2e7,
        ..TelegraphRecord::default()
    };
    let current_clamp = TelegraphRecord {
        com_port_id: 1,
        channel_id: 2,
        hardware_type: HardwareType::Mc700A,
        operating_mode: OperatingMode::CurrentClamp,
        primary: OutputSignal {
            signal: 5,
            alpha: 10.0,
            scale_factor: 1.0,
            units: ScaleFactorUnits::VoltsPerMillivolt,
            lpf_cutoff: LPF_BYPASS,
        },
        secondary: None,
        ..TelegraphRecord::default()
    };

    let mut writer = RecordWriter::new(Cursor::new(Vec::new()));
    writer.write_record(&voltage_clamp)?;
    writer.write_record_with(&current_clamp, RecordLayout::Legacy)?;
    let capture = writer.into_inner().into_inner();
    eprintln!("[writer] capture holds {} bytes", capture.len());

    for decoded in RecordReader::new(Cursor::new(capture)) {
        let decoded = decoded?;
        let record = &decoded.record;
        let word = record
            .channel_identifier()
            .map(|id: ChannelId| format!("0x{:08X}", id.pack()))
            .unwrap_or_else(|| "-".to_string());
        eprintln!(
            "[reader] v{} {} {} channel={} primary={}",
            decoded.version,
            record.hardware_type,
            record.operating_mode,
            word,
            record.primary_signal_name().unwrap_or("?"),
        );
    }

    Ok(())
}
