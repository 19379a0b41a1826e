//! Command-line entry point.

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Credentials may live in a .env file next to the binary
    dotenvy::dotenv().ok();
    // Progress lines are part of the tool's output, so default to info
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    cli::run().await?;

    Ok(())
}
