mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "mctelegraph", version, about = "MultiClamp telegraph record tools")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text",
        env = "MCTELEGRAPH_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "MCTELEGRAPH_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pack_subcommand() {
        let cli = Cli::try_parse_from([
            "mctelegraph",
            "pack",
            "--scheme",
            "700b",
            "--serial",
            "836019",
            "--channel",
            "1",
        ])
        .expect("pack args should parse");

        assert!(matches!(cli.command, Command::Pack(_)));
    }

    #[test]
    fn parses_hex_word_for_unpack() {
        let cli = Cli::try_parse_from(["mctelegraph", "unpack", "-s", "700a", "0x12345678"])
            .expect("unpack args should parse");
        match cli.command {
            Command::Unpack(args) => assert_eq!(args.word, 0x1234_5678),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_encode_inputs() {
        let err = Cli::try_parse_from([
            "mctelegraph",
            "encode",
            "records.json",
            "--json",
            "{}",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_unknown_scheme() {
        let err = Cli::try_parse_from(["mctelegraph", "unpack", "-s", "700c", "1"])
            .expect_err("unknown scheme should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
