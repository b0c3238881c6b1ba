use mctelegraph_codec::ChannelId;
use tracing::warn;

use crate::cmd::{MatchArgs, PackArgs, UnpackArgs};
use crate::exit::{CliResult, FAILURE, SUCCESS};
use crate::output::{hex_word, print_channel_id, print_match, OutputFormat};

pub fn pack(args: PackArgs, format: OutputFormat) -> CliResult<i32> {
    let id = args.channel.to_channel_id()?;
    let word = id.pack();

    // Packing masks silently; tell the operator when a field did not fit.
    let stored = ChannelId::unpack(id.scheme(), word);
    if stored != id {
        warn!(
            requested = ?id,
            stored = ?stored,
            word = %hex_word(word),
            "channel fields exceed their bit widths and were masked"
        );
    }

    print_channel_id(stored, format);
    Ok(SUCCESS)
}

pub fn unpack(args: UnpackArgs, format: OutputFormat) -> CliResult<i32> {
    let id = ChannelId::unpack(args.scheme.into(), args.word);
    print_channel_id(id, format);
    Ok(SUCCESS)
}

pub fn matches(args: MatchArgs, format: OutputFormat) -> CliResult<i32> {
    let id = args.channel.to_channel_id()?;
    let matched = id.matches(args.word);
    print_match(id, args.word, matched, format);
    Ok(if matched { SUCCESS } else { FAILURE })
}
