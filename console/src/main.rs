use clap::Parser;
use surgical_console::{Config, Controller, StdTerminal, UreqTransport};
use surgical_core::{RecordService, RecordsClient};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    // stderr keeps log lines out of the interactive prompts on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(api_url = %config.api_url, "starting");
    let service = RecordService::new(RecordsClient::new(&config.api_url), UreqTransport::new());
    let mut controller = Controller::new(service, StdTerminal::stdio(), config.export_path);
    controller.run()
}
