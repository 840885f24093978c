//! HTTP surface. `configure` is shared by `main` and the integration tests
//! so both serve the exact same route table.

use actix_web::web;

use crate::middleware::jwt_extract::JwtExtract;

pub mod assignments;
pub mod auth;
pub mod classes;
pub mod courses;
pub mod grades;
pub mod health;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Public auth endpoints; exact resources so /api/auth/me falls through
    // to the protected scope below.
    cfg.configure(auth::configure_public);

    // Everything else under /api requires a verified bearer token
    cfg.service(
        web::scope("/api")
            .wrap(JwtExtract)
            .configure(auth::configure_routes)
            .configure(users::configure_routes)
            .configure(classes::configure_routes)
            .configure(courses::configure_routes)
            .configure(assignments::configure_routes)
            .configure(grades::configure_routes),
    );
}
