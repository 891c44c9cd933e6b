use crate::args::ReceiverArgs;

use castfx_logging::ReceiverLogger;
use clap::Parser;
use log::{debug, info, LevelFilter};
use std::io;
use tokio::io::BufReader;

mod args;
mod bus;
mod console;
mod receiver;

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = ReceiverArgs::parse();
    let logger = init_logger(&args).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    info!(
        "Starting castfx receiver {} with {}",
        castfx_core::VERSION,
        args
    );
    if let Some(logger) = logger.as_ref() {
        debug!("Receiver is logging at level {}", logger.root_level());
    }
    let properties = args.properties();

    receiver::start(BufReader::new(tokio::io::stdin()), properties).await
}

/// Initialize the `log4rs` logger of the receiver, unless it has been disabled.
fn init_logger(args: &ReceiverArgs) -> castfx_logging::Result<Option<ReceiverLogger>> {
    if args.disable_logger {
        return Ok(None);
    }

    let mut builder = ReceiverLogger::builder();
    builder
        .root_level(args.log_level)
        .logger("fx_callback", LevelFilter::Info)
        .logger("mio", LevelFilter::Info);
    if let Some(path) = args.log_config.as_ref() {
        builder.config_path(path);
    }
    if let Some(path) = args.log_file.as_ref() {
        builder.log_path(path);
    }

    builder.build().map(Some)
}
