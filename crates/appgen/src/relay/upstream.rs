use crate::prelude::*;
use appgen_core::envelope::{ProxyEnvelope, RelayMode};
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, serde::Serialize)]
pub struct AccumulatedBody {
    pub data: String,
}

/// Send the envelope body to the upstream endpoint with the caller's key as
/// bearer token, and hand the result back in the envelope's relay mode.
pub async fn forward(
    client: &reqwest::Client,
    upstream_url: &str,
    envelope: ProxyEnvelope,
) -> Result<Response, Error> {
    let mode = envelope.mode();
    let (api_key, body) = envelope.into_parts();

    log::info!("Forwarding {mode} request to {upstream_url}");

    let response = client
        .post(upstream_url)
        .bearer_auth(&api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Internal(f!("Upstream request failed: {e}")))?;

    let status = response.status();
    log::info!("Upstream responded with {status}");

    if !status.is_success() {
        let text = response
            .text()
            .await
            .map_err(|e| Error::Internal(f!("Failed to read upstream error body: {e}")))?;
        let message = if text.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Upstream request failed")
                .to_string()
        } else {
            text
        };
        log::warn!("Upstream error {status}: {message}");
        return Err(Error::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    match mode {
        RelayMode::Buffered => {
            let data: serde_json::Value = response
                .json()
                .await
                .map_err(|e| Error::Internal(f!("Failed to parse upstream response: {e}")))?;
            Ok(Json(data).into_response())
        }
        RelayMode::Accumulate => {
            let data = crate::http::read_chunks(response)
                .await
                .map_err(|e| Error::Internal(f!("Failed to read upstream stream: {e}")))?;
            log::info!("Accumulated {} bytes from upstream stream", data.len());
            Ok(Json(AccumulatedBody { data }).into_response())
        }
    }
}
