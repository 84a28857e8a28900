use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_hexsolve::prelude::*;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let options = HexShellOptions::parse();
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            _ => AdaptiveFormat::Default,
        })
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    let mut shell = HexShell::new(options);
    shell.run()
}
