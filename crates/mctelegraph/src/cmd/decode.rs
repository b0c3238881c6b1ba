use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use mctelegraph_codec::{DecodeConfig, RecordReader, TelegraphError};
use tracing::{debug, info};

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, telegraph_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_record, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = DecodeConfig {
        accept_legacy: !args.no_legacy,
        accept_forward: !args.no_forward,
        max_record_size: args.max_record_size,
    };
    let input = open_input(args.input.as_deref())?;
    let reader = RecordReader::with_config(input, config);

    let mut decoded_count = 0usize;
    let mut provisional_count = 0usize;
    for item in reader.take(args.count.unwrap_or(usize::MAX)) {
        let decoded = item.map_err(|err| match err {
            TelegraphError::StreamClosed => CliError::new(
                DATA_INVALID,
                format!("record {decoded_count}: capture ends inside a record"),
            ),
            other => telegraph_error(&format!("record {decoded_count}"), other),
        })?;

        if decoded.is_provisional() {
            provisional_count += 1;
        }
        print_record(decoded_count, &decoded, format);
        decoded_count += 1;
    }

    info!(
        records = decoded_count,
        provisional = provisional_count,
        "decode complete"
    );
    Ok(SUCCESS)
}

fn open_input(path: Option<&Path>) -> CliResult<Box<dyn Read>> {
    match path {
        None => Ok(Box::new(io::stdin().lock())),
        Some(path) if path.as_os_str() == "-" => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            debug!(path = %path.display(), "opening capture");
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            Ok(Box::new(file))
        }
    }
}
