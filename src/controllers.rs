pub mod config;
pub mod health;
pub mod static_files;
pub mod status;
pub mod urls;

use actix_web::web;

use crate::errors::PingerError;

pub use static_files::FrontendDir;

/// Register every API route. Unmatched requests are left to the app's
/// default service, see [`static_files::fallback`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        PingerError::invalid_input(format!("Invalid request body: {}", err)).into()
    }))
    .route("/health", web::get().to(health::health_check))
    .route("/status", web::get().to(status::get_status))
    .route("/config", web::get().to(config::get_config))
    .route("/config/interval/{minutes}", web::post().to(config::set_interval))
    .route("/config/toggle-ping", web::post().to(config::toggle_ping))
    .route("/urls", web::post().to(urls::add_url))
    .route("/urls/{url:.*}", web::delete().to(urls::remove_url));
}
