use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use segpt::catalog::Catalog;
use segpt::config::{LoggingSettings, Settings};
use segpt::core::Matcher;
use segpt::routes::{self, AppState};
use segpt::services::{ChatProvider, ChatProxy, LlmProvider};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.init(),
    }
}

fn startup_error(message: String) -> std::io::Error {
    error!("{}", message);
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting SEGPT service...");

    let catalog = Arc::new(
        Catalog::load(settings.data.dir.as_deref())
            .map_err(|e| startup_error(format!("Failed to load datasets: {}", e)))?,
    );

    info!(
        "Catalog loaded: {} grants, {} incubators, {} investors, {} directory listings",
        catalog.grants().len(),
        catalog.incubators().len(),
        catalog.investors().len(),
        catalog.directory().len()
    );

    let weights = settings.scoring_weights();
    let matcher = Matcher::new(weights, settings.recommend.top_n);

    info!("Matcher initialized with weights: {:?}", weights);

    let provider = LlmProvider::from_settings(&settings.chat)
        .map_err(|e| startup_error(format!("Failed to build chat client: {}", e)))?;

    if provider.is_configured() {
        info!("Chat provider: {}", provider.name());
    } else {
        warn!(
            "{} is not set, chat will answer from the local catalog only",
            provider.api_key_var()
        );
    }

    let chat = Arc::new(ChatProxy::new(provider, catalog.clone(), matcher.clone(), &settings.chat));

    let app_state = AppState { catalog, matcher, chat };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure_extractors)
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
