use actix_web::{HttpRequest, HttpResponse, web};
use percent_encoding::percent_decode_str;
use tracing::info;

use crate::errors::{PingerError, Result};
use crate::models::api::{AddUrlRequest, UrlsResponse};
use crate::state::AppState;

// Start monitoring a URL
pub async fn add_url(
    data: web::Data<AppState>,
    body: web::Json<AddUrlRequest>,
) -> Result<HttpResponse> {
    let url = body
        .into_inner()
        .url
        .ok_or_else(|| PingerError::invalid_input("URL is required"))?;
    info!("Request to add URL: {}", url);

    let urls = data.scheduler.add_url(&url).await?;

    Ok(HttpResponse::Ok().json(UrlsResponse { success: true, urls }))
}

// Stop monitoring a URL. The URL arrives percent-encoded in the last path
// segment; decode it from the raw request path so encoded slashes survive.
pub async fn remove_url(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse> {
    let raw = req
        .uri()
        .path()
        .strip_prefix("/urls/")
        .unwrap_or_default();
    let url = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| PingerError::invalid_input("URL is not valid UTF-8"))?;
    info!("Request to remove URL: {}", url);

    let urls = data.scheduler.remove_url(&url).await;

    Ok(HttpResponse::Ok().json(UrlsResponse { success: true, urls }))
}
