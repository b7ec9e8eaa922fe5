//! Telegram webhook receiver.
//!
//! This endpoint is exempt from the authentication gate: it is called by
//! Telegram's servers, not by a Mini App client, and carries no launch
//! credential. Update processing (bot commands, outbound replies) happens
//! in the bot worker, which consumes the same user store; the receiver
//! only acknowledges delivery so Telegram stops retrying.

use axum::Json;
use serde_json::Value;

/// POST /api/bot/webhook - acknowledge a Telegram update.
pub async fn receive(Json(update): Json<Value>) -> &'static str {
    let update_id = update.get("update_id").and_then(Value::as_i64);
    tracing::debug!(update_id, "webhook update received");

    "ok"
}
