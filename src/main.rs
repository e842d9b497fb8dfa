//! Waitroom binary entry point.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    waitroom::cli::run().await
}
