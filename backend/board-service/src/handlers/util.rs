/// Static responses shared by all routes
use actix_web::HttpResponse;

/// Answer 401 so the browser forgets its Basic credentials
pub async fn handle_logout() -> HttpResponse {
    HttpResponse::Unauthorized()
        .content_type("text/plain; charset=utf-8")
        .body("Logged out")
}

pub async fn handle_not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body("Page not found")
}

pub async fn handle_bad_request() -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type("text/plain; charset=utf-8")
        .body("Unsupported method")
}

/// Liveness probe, served outside the authentication gate
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "board-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
