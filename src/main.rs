use anyhow::Result;
use crypto_tracker::app::bootstrap;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    bootstrap::run().await?;
    Ok(())
}
