//! Command-line interface for registry-populate
//!
//! # Usage Examples
//!
//! ```bash
//! # Register 300k nodes x 10 services x 3 checks with 1000 workers
//! registry-populate catalog
//!
//! # Stop on the first failed node instead of logging and moving on
//! registry-populate catalog --nodes 10000 --error-policy fail-fast
//!
//! # 40k KV blobs of 400 bytes, then remove them
//! registry-populate kv
//! registry-populate kvclean
//! ```

use clap::Parser;
use registry_populate::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit 1; help and version exit 0
        Err(e) if e.use_stderr() => {
            eprint!("{e}");
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
