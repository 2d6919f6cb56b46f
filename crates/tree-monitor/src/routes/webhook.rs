//! LoRaWAN network server webhook.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::Result;
use crate::pipeline::IngestOutcome;
use crate::state::AppState;

/// Webhook acknowledgement.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_awarded: Option<i64>,
}

/// Accept one uplink from the network server.
///
/// Any body that does not decode as a payload is a 400, whatever its
/// content type.
pub async fn lorawan(State(state): State<AppState>, body: Bytes) -> Result<Json<WebhookResponse>> {
    let response = match state.pipeline.ingest(&body).await? {
        IngestOutcome::Stored { tokens_awarded, .. } => WebhookResponse {
            message: "Measurement received",
            tokens_awarded: Some(tokens_awarded),
        },
        IngestOutcome::Duplicate => WebhookResponse {
            message: "Duplicate measurement ignored",
            tokens_awarded: None,
        },
    };

    Ok(Json(response))
}
