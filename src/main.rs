//! DynUI command-line entry point

use dynui::{cli::run_cli, Result};

#[tokio::main]
async fn main() -> Result<()> {
    run_cli().await
}
