use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use teloxide::types::Update;
use warden_bot::bot::handler::handle_update;

use crate::{dto::MessageResponse, error::ErrorServer, state::ServerState};

pub async fn receive_update(
    State(server_state): State<Arc<ServerState>>,
    Json(update): Json<Update>,
) -> Result<Json<MessageResponse>, ErrorServer> {
    let update_id = update.id.0;

    handle_update(update, server_state.bot_deps())
        .await
        .map_err(|e| {
            log::error!("Failed to handle update {}: {}", update_id, e);
            ErrorServer {
                status: StatusCode::INTERNAL_SERVER_ERROR.into(),
                message: e.to_string(),
            }
        })?;

    Ok(Json(MessageResponse::from("ok")))
}
