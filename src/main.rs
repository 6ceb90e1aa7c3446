use tokio::net::TcpListener;
use tracing::{info, warn};
use chronicles_of_yore::{
    config::Config,
    api::routes::create_router,
    logging::configure_logging,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    configure_logging("info,tower_http=info");

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(?config, "configuration loaded");

    // Missing keys are reported per request; warn early so operators notice
    if config.google_api_key.is_none() {
        warn!("GOOGLE_API_KEY is not set; generation endpoints will answer 500");
    }
    if config.news_api_key.is_none() {
        warn!("NEWS_API_KEY is not set; the news endpoint will answer 500");
    }

    let app_state = AppState::from_config(config);
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;

    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
