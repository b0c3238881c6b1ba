use clap::{Args, Subcommand, ValueEnum};
use mctelegraph_codec::{ChannelId, ChannelScheme, DEFAULT_MAX_RECORD_SIZE};
use std::path::PathBuf;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod channel;
pub mod decode;
pub mod encode;
pub mod envinfo;
pub mod messages;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack a channel identity into its 32-bit telegraph word.
    Pack(PackArgs),
    /// Unpack a 32-bit telegraph word into channel fields.
    Unpack(UnpackArgs),
    /// Check whether a telegraph word names a channel (exit 1 if not).
    Match(MatchArgs),
    /// Decode telegraph records from a capture file or stdin.
    Decode(DecodeArgs),
    /// Encode JSON records into wire records.
    Encode(EncodeArgs),
    /// List the registered telegraph notification names.
    Messages(MessagesArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Pack(args) => channel::pack(args, format),
        Command::Unpack(args) => channel::unpack(args, format),
        Command::Match(args) => channel::matches(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args),
        Command::Messages(args) => messages::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    /// MultiClamp 700A: serial port, AxoBus device and channel.
    #[value(name = "700a")]
    Mc700A,
    /// MultiClamp 700B: serial number and channel.
    #[value(name = "700b")]
    Mc700B,
}

impl From<SchemeArg> for ChannelScheme {
    fn from(scheme: SchemeArg) -> Self {
        match scheme {
            SchemeArg::Mc700A => ChannelScheme::Mc700A,
            SchemeArg::Mc700B => ChannelScheme::Mc700B,
        }
    }
}

#[derive(Args, Debug)]
pub struct ChannelArgs {
    /// Channel id scheme.
    #[arg(long, short = 's')]
    pub scheme: SchemeArg,
    /// Serial port number (700a).
    #[arg(long, value_name = "N")]
    pub com_port: Option<u32>,
    /// AxoBus device number (700a).
    #[arg(long, value_name = "N", default_value = "0")]
    pub axobus: u32,
    /// Amplifier serial number (700b).
    #[arg(long, value_name = "N")]
    pub serial: Option<u32>,
    /// Amplifier channel.
    #[arg(long, short = 'c')]
    pub channel: u32,
}

impl ChannelArgs {
    pub fn to_channel_id(&self) -> CliResult<ChannelId> {
        match self.scheme {
            SchemeArg::Mc700A => {
                if self.serial.is_some() {
                    return Err(CliError::new(USAGE, "--serial applies to 700b only"));
                }
                let com_port_id = self
                    .com_port
                    .ok_or_else(|| CliError::new(USAGE, "--com-port is required for 700a"))?;
                Ok(ChannelId::Mc700A {
                    com_port_id,
                    axobus_id: self.axobus,
                    channel_id: self.channel,
                })
            }
            SchemeArg::Mc700B => {
                if self.com_port.is_some() {
                    return Err(CliError::new(USAGE, "--com-port applies to 700a only"));
                }
                let serial_number = self
                    .serial
                    .ok_or_else(|| CliError::new(USAGE, "--serial is required for 700b"))?;
                Ok(ChannelId::Mc700B {
                    serial_number,
                    channel_id: self.channel,
                })
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct PackArgs {
    #[command(flatten)]
    pub channel: ChannelArgs,
}

#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// Channel id scheme.
    #[arg(long, short = 's')]
    pub scheme: SchemeArg,
    /// Telegraph word (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_word)]
    pub word: u32,
}

#[derive(Args, Debug)]
pub struct MatchArgs {
    #[command(flatten)]
    pub channel: ChannelArgs,
    /// Telegraph word (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_word)]
    pub word: u32,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file of concatenated records. Default: stdin.
    pub input: Option<PathBuf>,
    /// Reject legacy (version 5) records.
    #[arg(long)]
    pub no_legacy: bool,
    /// Reject records from newer telegraph versions.
    #[arg(long)]
    pub no_forward: bool,
    /// Stop after N records.
    #[arg(long)]
    pub count: Option<usize>,
    /// Largest record size accepted from the stream.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_RECORD_SIZE)]
    pub max_record_size: usize,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// JSON file holding one record or an array of records. Default: stdin.
    #[arg(conflicts_with = "json")]
    pub input: Option<PathBuf>,
    /// Inline JSON record or array of records.
    #[arg(long)]
    pub json: Option<String>,
    /// Emit legacy (version 5) records.
    #[arg(long)]
    pub legacy: bool,
    /// Write records to a file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct MessagesArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}

fn parse_word(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => input.replace('_', "").parse::<u32>(),
    };
    parsed.map_err(|err| format!("invalid telegraph word {input:?}: {err}"))
}
