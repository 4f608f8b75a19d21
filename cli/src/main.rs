use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use measure_cli::{Args, UreqTransport, WriterSink};
use measure_core::RequestDispatcher;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries only the rendered message.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let dispatcher = RequestDispatcher::new(UreqTransport::new()).with_base_url(&args.base_url);
    let mut sink = WriterSink::stdout();
    dispatcher.send_request(&args, &mut sink);

    sink.into_inner().flush().context("flushing stdout")?;
    Ok(())
}
