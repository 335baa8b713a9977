use anyhow::Result;
use kontent::cli;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = cli::run().await {
        cli::ux::present_error(e);
        std::process::exit(1);
    }
    Ok(())
}
