//! Relay binary - main entry point.
//!
//! Reads newline-delimited XML test-event fragments from stdin, translates
//! them, and forwards the resulting protocol frames to a TCP consumer. At
//! end of input it sends the run-complete signal. Useful for wiring a test
//! runner that writes events to a pipe into a consumer listening on a
//! socket.

use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;

use testwire::reporter::RunReporter;
use testwire::transport::TcpTransport;
use testwire::ReporterConfig;

#[derive(Parser, Debug)]
#[command(
    name = "testwire-relay",
    about = "Relay XML test events from stdin to a protocol consumer over TCP"
)]
struct Args {
    /// Address of the listening protocol consumer.
    #[arg(long)]
    connect: Option<String>,

    /// Optional JSON configuration file overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> testwire::Result<()> {
    let args = Args::parse();

    testwire::observability::init_tracing();

    let mut config = match &args.config {
        Some(path) => serde_json::from_str::<ReporterConfig>(&std::fs::read_to_string(path)?)?,
        None => ReporterConfig::default(),
    };
    if let Some(connect) = args.connect {
        config.transport.connect_addr = connect;
    }

    let transport = TcpTransport::connect(&config.transport)?;
    let mut reporter = RunReporter::new(transport, config.shutdown.clone());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        reporter.report(line.as_str())?;
    }

    reporter.complete()?;
    tracing::info!("Run relayed; consumer signalled");
    Ok(())
}
