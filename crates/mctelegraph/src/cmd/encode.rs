use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use mctelegraph_codec::{RecordLayout, RecordWriter, TelegraphRecord};
use tracing::info;

use crate::cmd::EncodeArgs;
use crate::exit::{io_error, telegraph_error, CliError, CliResult, DATA_INVALID, SUCCESS};

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let text = read_input(&args)?;
    let records = parse_records(&text)?;
    let layout = if args.legacy {
        RecordLayout::Legacy
    } else {
        RecordLayout::Current
    };

    let sink: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|err| {
            io_error(&format!("failed creating {}", path.display()), err)
        })?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = RecordWriter::with_layout(sink, layout);

    for (index, record) in records.iter().enumerate() {
        writer
            .write_record(record)
            .map_err(|err| telegraph_error(&format!("record {index}"), err))?;
    }

    info!(
        records = records.len(),
        version = layout.version(),
        "encode complete"
    );
    Ok(SUCCESS)
}

fn read_input(args: &EncodeArgs) -> CliResult<String> {
    if let Some(json) = &args.json {
        return Ok(json.clone());
    }
    match args.input.as_deref() {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(text)
        }
    }
}

/// Accepts a single record object or an array of them.
fn parse_records(text: &str) -> CliResult<Vec<TelegraphRecord>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|err| CliError::new(DATA_INVALID, format!("input is not valid JSON: {err}")))?;

    let records = if value.is_array() {
        serde_json::from_value::<Vec<TelegraphRecord>>(value)
    } else {
        serde_json::from_value::<TelegraphRecord>(value).map(|record| vec![record])
    };
    records.map_err(|err| CliError::new(DATA_INVALID, format!("invalid record JSON: {err}")))
}

#[cfg(test)]
mod tests {
    use mctelegraph_codec::{HardwareType, OperatingMode};

    use super::*;

    #[test]
    fn parses_single_record() {
        let records = parse_records(r#"{"channel_id": 2, "hardware_type": "700a"}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].channel_id, 2);
        assert_eq!(records[0].hardware_type, HardwareType::Mc700A);
    }

    #[test]
    fn parses_record_array() {
        let records = parse_records(
            r#"[{"channel_id": 1}, {"channel_id": 2, "operating_mode": "current_clamp"}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].operating_mode, OperatingMode::CurrentClamp);
    }

    #[test]
    fn rejects_bad_json() {
        assert_eq!(parse_records("{").unwrap_err().code, DATA_INVALID);
        assert_eq!(
            parse_records(r#"{"operating_mode": "bogus"}"#)
                .unwrap_err()
                .code,
            DATA_INVALID
        );
    }
}
