//! URL Pinger Binary

use actix_web::{App, HttpServer, web};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url_pinger::controllers::{self, FrontendDir, static_files};
use url_pinger::{AppState, FileGateway, HttpProber, Scheduler, Settings};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let settings = Settings::parse();

    initialize_tracing()?;

    info!("Starting URL pinger v{}", env!("CARGO_PKG_VERSION"));

    let prober = HttpProber::new(settings.probe_timeout())?;
    let gateway = FileGateway::new(settings.config_store.clone());
    info!("Configuration store: {}", gateway.path().display());

    let scheduler = Arc::new(
        Scheduler::bootstrap(settings.default_config(), Arc::new(prober), Arc::new(gateway)).await,
    );
    scheduler.start().await;

    let state = web::Data::new(AppState::new(Arc::clone(&scheduler)));
    if let Some(dir) = &settings.frontend_dir {
        info!("Serving dashboard from {}", dir.display());
    }
    let frontend = web::Data::new(FrontendDir(settings.frontend_dir.clone()));
    let bind_addr = settings.bind_addr();
    info!("Server running on http://{}:{}", bind_addr.0, bind_addr.1);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(frontend.clone())
            .configure(controllers::configure)
            .default_service(web::to(static_files::fallback))
    })
    .bind(bind_addr)
    .inspect_err(|e| error!("Failed to bind listener: {}", e))?
    .run();

    let result = server.await;

    scheduler.stop().await;
    info!("URL pinger shut down");

    Ok(result?)
}

/// Initialize structured logging
fn initialize_tracing() -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    Ok(())
}
