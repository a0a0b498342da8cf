use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::{header, Method}, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use contact_intake::{
    background_task::start_purge_task,
    graceful_shutdown::shutdown_signal,
    mailer::mailgun::MailgunSender,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    AppState
};

fn cors_for(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods([Method::POST])
        .allow_any_header()
        .expose_headers([header::HeaderName::from_static("hx-trigger")])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let sender = match MailgunSender::new(&config) {
        Ok(sender) => sender,
        Err(e) => {
            tracing::error!("Notification sender setup failed: {}", e);
            std::process::exit(1);
        }
    };

    let Some(allowed_origin) = config.allowed_origin() else {
        tracing::error!("FRONTEND_URL is not a valid origin");
        std::process::exit(1);
    };

    let app_state = web::Data::new(
        AppState::new(&config, Arc::new(sender))
    );

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {} (origin {})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        allowed_origin
    );

    let guard = app_state.guard().clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(cors_for(&allowed_origin))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::spawn(start_purge_task(guard, config.purge_interval()));

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
