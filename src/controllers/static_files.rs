//! Dashboard files, served for any request the API routes do not match

use actix_web::{HttpRequest, HttpResponse, http::Method, web};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Directory the dashboard is served from. `None` disables the fallback.
#[derive(Debug, Clone, Default)]
pub struct FrontendDir(pub Option<PathBuf>);

pub async fn fallback(req: HttpRequest, frontend: Option<web::Data<FrontendDir>>) -> HttpResponse {
    let Some(root) = frontend.as_ref().and_then(|f| f.0.as_ref()) else {
        return HttpResponse::NotFound().finish();
    };
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return HttpResponse::NotFound().finish();
    }

    let Ok(path) = percent_decode_str(req.path()).decode_utf8() else {
        return HttpResponse::NotFound().finish();
    };
    let Some(relative) = resolve(&path) else {
        debug!("Refusing dashboard path {}", path);
        return HttpResponse::NotFound().finish();
    };

    let file = root.join(&relative);
    match tokio::fs::read(&file).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(&relative).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.to_string())
                .body(contents)
        }
        Err(e) => {
            debug!("No dashboard file at {}: {}", file.display(), e);
            HttpResponse::NotFound().finish()
        }
    }
}

/// Paths without an extension load `index.html`. Anything that would leave
/// the frontend directory is refused.
fn resolve(path: &str) -> Option<PathBuf> {
    let has_extension = path
        .rfind('.')
        .map(|i| i > path.rfind('/').unwrap_or(0))
        .unwrap_or_default();
    if path == "/" || !has_extension {
        return Some(PathBuf::from("index.html"));
    }

    let relative = Path::new(path.trim_start_matches('/'));
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| relative.to_path_buf())
}
