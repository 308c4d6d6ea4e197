use actix_web::web;

pub mod health;
pub mod users;

/// Registers every route. Shared by `main` and the test app builder so both
/// serve the same surface.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.configure(users::configure_routes);
}
