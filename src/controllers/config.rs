use actix_web::{HttpResponse, Responder, web};
use tracing::info;

use crate::errors::{PingerError, Result};
use crate::models::api::{IntervalResponse, ToggleResponse};
use crate::state::AppState;

pub async fn get_config(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(data.scheduler.config().await)
}

pub async fn set_interval(
    data: web::Data<AppState>,
    minutes: web::Path<String>,
) -> Result<HttpResponse> {
    let minutes = minutes.into_inner();
    info!("Request to set ping interval to {} minutes", minutes);

    let minutes: i64 = minutes
        .trim()
        .parse()
        .map_err(|_| PingerError::invalid_input("Invalid interval value"))?;
    let ping_interval = data.scheduler.set_interval(minutes).await?;

    Ok(HttpResponse::Ok().json(IntervalResponse {
        success: true,
        ping_interval,
    }))
}

pub async fn toggle_ping(data: web::Data<AppState>) -> impl Responder {
    let is_pinging = data.scheduler.toggle_pinging().await;

    HttpResponse::Ok().json(ToggleResponse {
        success: true,
        is_pinging,
    })
}
