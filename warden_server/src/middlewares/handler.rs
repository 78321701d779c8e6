use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::ErrorServer, state::ServerState};

pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Rejects update deliveries that do not carry the configured webhook secret.
pub async fn verify_secret(
    State(server_state): State<Arc<ServerState>>,
    req: Request,
    next: Next,
) -> Result<Response, ErrorServer> {
    if let Some(expected) = server_state.webhook_secret() {
        let token = req
            .headers()
            .get(SECRET_HEADER)
            .and_then(|h| h.to_str().ok());

        if token != Some(expected) {
            log::warn!("Rejected update with missing or wrong secret token");
            return Err(ErrorServer {
                message: "Unauthorized".to_string(),
                status: 401,
            });
        }
    }

    Ok(next.run(req).await)
}
