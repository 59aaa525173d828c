use anyhow::Result;
use tracing::info;

use fuzzymax_uci::UciEngine;

fn main() -> Result<()> {
    // Protocol output goes to stdout; keep logs on stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    info!("fuzzymax starting");
    UciEngine::new().run()?;
    Ok(())
}
