use drone_miner::config::ServiceConfig;
use drone_miner::network::http_api;
use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::from_env();
    if let Err(e) = http_api::start(config).await {
        error!("Failed to start server: {}", e);
        std::process::exit(1);
    }
}
