use actix_web::{HttpResponse, Responder, web};
use tracing::debug;

use crate::models::api::{StatusResponse, UrlStat};
use crate::state::AppState;

// Latest result for every monitored URL
pub async fn get_status(data: web::Data<AppState>) -> impl Responder {
    let snapshot = data.scheduler.snapshot().await;
    debug!("Returning status for {} URLs", snapshot.results.len());

    let stats: Vec<UrlStat> = snapshot
        .results
        .into_iter()
        .map(|(url, last_status)| UrlStat { url, last_status })
        .collect();

    HttpResponse::Ok().json(StatusResponse {
        monitored: stats.len(),
        stats,
        is_pinging: snapshot.config.is_pinging,
        ping_interval: snapshot.config.ping_interval_ms,
    })
}
