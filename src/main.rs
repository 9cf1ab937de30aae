use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use call_insight::{
    analyzer::{self, Analyzer},
    api::routes::create_router,
    call_log::CallLog,
    config::Config,
    llm::{ChatBackend, GroqClient},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting call-insight v{}", env!("CARGO_PKG_VERSION"));

    // A missing key disables analysis but the form is still served
    let backend: Option<Arc<dyn ChatBackend>> = match config.groq_api_key.as_deref() {
        Some(key) => {
            let client = GroqClient::new(key, &config.groq_api_base)?;
            info!("Groq client initialized (model: {}, endpoint: {})", analyzer::MODEL, client.endpoint());
            Some(Arc::new(client) as Arc<dyn ChatBackend>)
        }
        None => {
            warn!("GROQ_API_KEY is not set; transcript analysis is disabled");
            None
        }
    };

    let call_log = CallLog::new(config.log_path.clone());
    info!("Appending analyses to {}", call_log.path().display());

    let server_addr = config.server_addr;
    let app_state = AppState {
        analyzer: Arc::new(Analyzer::new(backend)),
        call_log: Arc::new(call_log),
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
