//! gbsprite - command-line sprite sheet converter for GB Studio.

use std::process::ExitCode;

use gbsprite::cli;

fn main() -> ExitCode {
    cli::run()
}
