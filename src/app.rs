use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    let upload_limit = state.upload_body_limit;
    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/ui/view", get(handlers::view))
        .route(
            "/ui/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/ui/plot", get(handlers::plot))
        .route("/ui/controls", get(handlers::controls))
        .route("/ui/refresh", post(handlers::refresh))
        .route("/ui/banners/:id/dismiss", post(handlers::dismiss_banner))
        .with_state(state)
}
