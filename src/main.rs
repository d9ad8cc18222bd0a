use actix_cors::Cors;
use actix_web::{middleware, App, HttpServer};
use hrapi::config::{LoggingSettings, Settings};
use hrapi::routes::{configure_app, AppState};
use hrapi::services;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// RUST_LOG wins over the configured level when set
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging isn't up yet, so configuration errors go straight to stderr
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings.logging);

    info!("Starting HR API...");

    let store = services::connect(&settings.database).await.map_err(|e| {
        error!("Failed to open profile store: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    info!("Profile store ready");

    // Build application state
    let app_state = AppState {
        store,
        page_size: settings.pagination.page_size,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{} with {} workers", host, port, workers);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .configure(configure_app(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
