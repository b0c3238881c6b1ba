use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mctelegraph_codec::{
    ext_cmd_sens_units, ChannelId, Compatibility, DecodedRecord, OutputSignal, TelegraphMessage,
    TelegraphRecord, LPF_BYPASS, NO_MEMBRANE_CAP, NO_SERIES_RESISTANCE,
};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ChannelOutput {
    #[serde(flatten)]
    id: ChannelId,
    word: u32,
    hex: String,
}

impl ChannelOutput {
    fn new(id: ChannelId) -> Self {
        let word = id.pack();
        Self {
            id,
            word,
            hex: hex_word(word),
        }
    }
}

#[derive(Serialize)]
struct MatchOutput {
    #[serde(flatten)]
    channel: ChannelOutput,
    candidate: String,
    matched: bool,
}

#[derive(Serialize)]
struct RecordOutput<'a> {
    index: usize,
    version: u32,
    record_size: u32,
    compatibility: &'static str,
    provisional: bool,
    channel: Option<ChannelOutput>,
    primary_signal: Option<&'static str>,
    secondary_signal: Option<&'static str>,
    ext_cmd_sens_units: &'static str,
    record: &'a TelegraphRecord,
}

#[derive(Serialize)]
struct MessageOutput {
    kind: usize,
    name: &'static str,
    carries_channel_id: bool,
}

pub fn print_channel_id(id: ChannelId, format: OutputFormat) {
    let out = ChannelOutput::new(id);
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SCHEME", "FIELDS", "WORD"]);
            table.add_row(vec![
                id.scheme().as_str().to_string(),
                channel_fields(&id),
                out.hex,
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{} {} word={}", id.scheme().as_str(), channel_fields(&id), out.hex);
        }
        OutputFormat::Raw => println!("{}", out.word),
    }
}

pub fn print_match(id: ChannelId, candidate: u32, matched: bool, format: OutputFormat) {
    let out = MatchOutput {
        channel: ChannelOutput::new(id),
        candidate: hex_word(candidate),
        matched,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SCHEME", "FIELDS", "CANDIDATE", "MATCH"]);
            table.add_row(vec![
                id.scheme().as_str().to_string(),
                channel_fields(&id),
                out.candidate,
                yes_no(matched).to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} {} candidate={} match={}",
                id.scheme().as_str(),
                channel_fields(&id),
                out.candidate,
                yes_no(matched)
            );
        }
        OutputFormat::Raw => println!("{matched}"),
    }
}

pub fn print_record(index: usize, decoded: &DecodedRecord, format: OutputFormat) {
    let record = &decoded.record;
    match format {
        OutputFormat::Json => {
            let out = RecordOutput {
                index,
                version: decoded.version,
                record_size: decoded.record_size,
                compatibility: compatibility_name(decoded.compatibility),
                provisional: decoded.is_provisional(),
                channel: record.channel_identifier().map(ChannelOutput::new),
                primary_signal: record.primary_signal_name(),
                secondary_signal: record.secondary_signal_name(),
                ext_cmd_sens_units: ext_cmd_sens_units(record.operating_mode),
                record,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            for (field, value) in record_rows(index, decoded) {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "#{index} v{} {} {} ch={} primary={} secondary={}",
                decoded.version,
                record.hardware_type,
                record.operating_mode,
                channel_word(record),
                signal_summary(record.primary_signal_name(), Some(&record.primary)),
                signal_summary(record.secondary_signal_name(), record.secondary.as_ref()),
            );
        }
        OutputFormat::Raw => {
            println!(
                "{}\t{}\t{}\t{}",
                channel_word(record),
                record.operating_mode,
                record.primary_signal_name().unwrap_or("-"),
                record.secondary_signal_name().unwrap_or("-"),
            );
        }
    }
}

pub fn print_messages(format: OutputFormat) {
    let messages: Vec<MessageOutput> = TelegraphMessage::ALL
        .iter()
        .enumerate()
        .map(|(kind, message)| MessageOutput {
            kind,
            name: message.as_str(),
            carries_channel_id: message.carries_channel_id(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&messages),
        OutputFormat::Table => {
            let mut table = new_table(vec!["KIND", "NAME", "CHANNEL ID"]);
            for message in &messages {
                table.add_row(vec![
                    message.kind.to_string(),
                    message.name.to_string(),
                    yes_no(message.carries_channel_id).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for message in &messages {
                println!("{}", message.name);
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn record_rows(index: usize, decoded: &DecodedRecord) -> Vec<(&'static str, String)> {
    let record = &decoded.record;
    let mut rows = vec![
        ("RECORD", index.to_string()),
        (
            "VERSION",
            format!(
                "{} ({}, {} bytes)",
                decoded.version,
                compatibility_name(decoded.compatibility),
                decoded.record_size
            ),
        ),
        ("HARDWARE", record.hardware_type.to_string()),
        ("CHANNEL", channel_word(record)),
        ("MODE", record.operating_mode.to_string()),
        (
            "PRIMARY",
            signal_summary(record.primary_signal_name(), Some(&record.primary)),
        ),
        (
            "SECONDARY",
            signal_summary(record.secondary_signal_name(), record.secondary.as_ref()),
        ),
        (
            "EXT CMD SENS",
            format!(
                "{} {}",
                record.ext_cmd_sens,
                ext_cmd_sens_units(record.operating_mode)
            ),
        ),
        (
            "MEMBRANE CAP",
            sentinel_value(record.membrane_cap, NO_MEMBRANE_CAP, "F"),
        ),
        (
            "SERIES R",
            sentinel_value(record.series_resistance, NO_SERIES_RESISTANCE, "Ohm"),
        ),
    ];

    for (field, text) in [
        ("SERIAL", &record.serial_number),
        ("APP VERSION", &record.app_version),
        ("FIRMWARE", &record.firmware_version),
        ("DSP VERSION", &record.dsp_version),
    ] {
        if !text.is_empty() {
            rows.push((field, text.clone()));
        }
    }
    rows
}

fn signal_summary(name: Option<&str>, signal: Option<&OutputSignal>) -> String {
    let Some(signal) = signal else {
        return "-".to_string();
    };
    let lpf = if signal.lpf_cutoff == LPF_BYPASS {
        "bypass".to_string()
    } else {
        format!("{} Hz", signal.lpf_cutoff)
    };
    format!(
        "{} gain={} scale={} {} lpf={}",
        name.unwrap_or("?"),
        signal.alpha,
        signal.scale_factor,
        signal.units,
        lpf
    )
}

fn sentinel_value(value: f64, sentinel: f64, unit: &str) -> String {
    if value == sentinel {
        "n/a".to_string()
    } else {
        format!("{value} {unit}")
    }
}

fn channel_word(record: &TelegraphRecord) -> String {
    record
        .channel_identifier()
        .map(|id| hex_word(id.pack()))
        .unwrap_or_else(|| "-".to_string())
}

fn channel_fields(id: &ChannelId) -> String {
    match id {
        ChannelId::Mc700A {
            com_port_id,
            axobus_id,
            channel_id,
        } => format!("com={com_port_id} axobus={axobus_id} channel={channel_id}"),
        ChannelId::Mc700B {
            serial_number,
            channel_id,
        } => format!("serial={serial_number} channel={channel_id}"),
    }
}

fn compatibility_name(compatibility: Compatibility) -> &'static str {
    match compatibility {
        Compatibility::Exact => "exact",
        Compatibility::Legacy => "legacy",
        Compatibility::Forward => "forward",
    }
}

pub fn hex_word(word: u32) -> String {
    format!("0x{word:08X}")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use mctelegraph_codec::{decode_record, encode_record_into, HardwareType, RECORD_SIZE};

    use super::*;

    #[test]
    fn channel_output_flattens_scheme() {
        let out = ChannelOutput::new(ChannelId::Mc700A {
            com_port_id: 0x78,
            axobus_id: 0x56,
            channel_id: 0x1234,
        });
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["scheme"], "mc700a");
        assert_eq!(json["hex"], "0x12345678");
        assert_eq!(json["word"], 0x1234_5678u32);
    }

    #[test]
    fn record_rows_hide_sentinels() {
        let record = TelegraphRecord {
            hardware_type: HardwareType::Mc700A,
            com_port_id: 1,
            channel_id: 2,
            ..TelegraphRecord::default()
        };
        let mut wire = [0u8; RECORD_SIZE];
        encode_record_into(&record, &mut wire).unwrap();
        let decoded = decode_record(&wire).unwrap();

        let rows = record_rows(0, &decoded);
        let cap = rows.iter().find(|(field, _)| *field == "MEMBRANE CAP").unwrap();
        assert_eq!(cap.1, "n/a");
        let channel = rows.iter().find(|(field, _)| *field == "CHANNEL").unwrap();
        assert_eq!(channel.1, "0x00020001");
        assert!(!rows.iter().any(|(field, _)| *field == "SERIAL"));
    }

    #[test]
    fn lpf_bypass_is_named() {
        let signal = OutputSignal {
            lpf_cutoff: LPF_BYPASS,
            ..OutputSignal::default()
        };
        assert!(signal_summary(Some("Membrane Current"), Some(&signal)).ends_with("lpf=bypass"));
        assert_eq!(signal_summary(None, None), "-");
    }
}
