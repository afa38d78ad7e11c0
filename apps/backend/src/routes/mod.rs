use actix_web::web;

pub mod auth;
pub mod health;
pub mod users;

/// Register every route. Shared by `main.rs` and the integration tests.
///
/// `/health`, `/register` and `/login` are public; the user resources carry
/// their own `JwtExtract` gate.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    auth::configure_routes(cfg);
    users::configure_routes(cfg);
}
