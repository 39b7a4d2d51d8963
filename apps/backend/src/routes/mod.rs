use actix_web::web;

use crate::ws::session;

pub mod health;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check route: /healthz
    cfg.service(web::scope("/healthz").configure(health::configure_routes));

    // Realtime upgrade: /ws
    cfg.route("/ws", web::get().to(session::upgrade));
}
