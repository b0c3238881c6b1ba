use crate::cmd::MessagesArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_messages, OutputFormat};

pub fn run(_args: MessagesArgs, format: OutputFormat) -> CliResult<i32> {
    print_messages(format);
    Ok(SUCCESS)
}
