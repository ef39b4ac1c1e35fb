//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use surgical_core::DEFAULT_API_URL;

#[derive(Debug, Clone, Parser)]
#[command(name = "surgical-records")]
#[command(about = "Create, browse, update, delete and export patient surgical records")]
pub struct Config {
    /// Base URL of the records API
    #[arg(long, env = "SURGICAL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Where "export PDF" writes the report
    #[arg(long, env = "SURGICAL_EXPORT_PATH", default_value = "records.pdf")]
    pub export_path: PathBuf,

    /// tracing filter directive (logs go to stderr)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_filter: String,
}
