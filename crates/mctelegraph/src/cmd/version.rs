use mctelegraph_codec::{API_VERSION, LEGACY_API_VERSION};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("mctelegraph {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: mctelegraph");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("telegraph_api: {API_VERSION} (legacy {LEGACY_API_VERSION})");
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "features: serde={}, cli=true",
        cfg!(feature = "serde")
    );

    Ok(SUCCESS)
}
