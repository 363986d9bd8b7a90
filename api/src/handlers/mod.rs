//! Shared handler utilities

pub mod error_handler;

use actix_web::HttpResponse;

pub use error_handler::{
    handle_domain_error, missing_destination_response, validation_error_response,
};

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "rently-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
