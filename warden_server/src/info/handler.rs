use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};

use crate::{
    dto::{InfoQuery, MessageResponse},
    error::ErrorServer,
    state::ServerState,
};

/// Liveness check; `?setWebhook=true` also registers the webhook URL with Telegram.
pub async fn info(
    State(server_state): State<Arc<ServerState>>,
    Query(query): Query<InfoQuery>,
) -> Result<Json<MessageResponse>, ErrorServer> {
    if !query.wants_webhook() {
        return Ok(Json(MessageResponse::from("Bot is running")));
    }

    let url = server_state.webhook_url();

    server_state
        .bot_deps()
        .platform
        .set_webhook(url, server_state.webhook_secret())
        .await
        .map_err(|e| {
            log::error!("Failed to set webhook to {}: {}", url, e);
            ErrorServer {
                status: StatusCode::INTERNAL_SERVER_ERROR.into(),
                message: e.to_string(),
            }
        })?;

    log::info!("Webhook set to {}", url);

    Ok(Json(MessageResponse {
        message: format!("Webhook set to {}", url),
    }))
}

pub async fn not_found() -> ErrorServer {
    ErrorServer {
        status: StatusCode::NOT_FOUND.into(),
        message: "Not found".to_string(),
    }
}
