use manganato_api::{config, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();

    let config = config::load_from_env()?;
    logging::init(&config.log_level, &config.log_format)?;
    config.print_summary();

    server::run(config).await
}
