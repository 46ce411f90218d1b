use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    let public = Router::new().route("/auth/login", routing::post(handlers::login));

    let protected = Router::new()
        .route("/auth/me", routing::get(handlers::get_current_principal))
        .route(
            "/guardian/students",
            routing::get(handlers::auth::list_ward_students),
        )
        .route("/chat", routing::post(handlers::chat::chat))
        .route(
            "/reports",
            routing::post(handlers::report::submit_report)
                .get(handlers::report::list_reports),
        )
        .route("/reports/stats", routing::get(handlers::report::report_stats))
        .route(
            "/reports/{id}/status",
            routing::put(handlers::report::set_report_status),
        )
        .layer(middleware::from_fn(auth_middleware));

    public.merge(protected)
}
