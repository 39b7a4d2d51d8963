use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppError;

async fn healthz() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(healthz));
}
