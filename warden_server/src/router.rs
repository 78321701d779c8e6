use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    info::handler::{info, not_found},
    middlewares::handler::verify_secret,
    state::ServerState,
    update::handler::receive_update,
};

pub fn router(state: Arc<ServerState>) -> Router {
    let updates = post(receive_update)
        .route_layer(middleware::from_fn_with_state(state.clone(), verify_secret));

    Router::new()
        .route("/", get(info).merge(updates).fallback(not_found))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
