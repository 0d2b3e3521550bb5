use super::canvas::Canvas;
use super::notify::Notifier;
use crate::prelude::*;
use appgen_core::chat::GenerationRequest;
use appgen_core::error::GenerateError;
use appgen_core::export::ExportOptions;
use appgen_core::extract::{destream_sse, message_content, relay_error_message, GenerationResult};
use appgen_core::prompt::{build_request, AppRequest};
use appgen_core::state::AppState;
use serde_json::Value;

/// Per-run settings that do not live in the application state.
#[derive(Debug, Clone)]
pub struct GenerateSettings {
    pub model: String,
    pub user_text: String,
    pub max_tokens: Option<u32>,
    pub stream: bool,
    pub export: ExportOptions,
}

/// Client for the relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    url: String,
}

impl RelayClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Post one request and turn the reply into a [`GenerationResult`].
    pub async fn send(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationResult, GenerateError> {
        let unexpected = |e: &dyn std::fmt::Display| GenerateError::Unexpected(e.to_string());

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| unexpected(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Relay {
                status: status.as_u16(),
                message: relay_error_message(status.as_u16(), &body),
            });
        }

        let raw_text = if request.stream {
            let text = crate::http::read_chunks(response)
                .await
                .map_err(|e| unexpected(&e))?;
            let envelope: Value = serde_json::from_str(&text).map_err(|e| unexpected(&e))?;
            let data = envelope
                .get("data")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    GenerateError::Unexpected("Relay stream reply has no data field".to_string())
                })?;
            destream_sse(data)
        } else {
            let body: Value = response.json().await.map_err(|e| unexpected(&e))?;
            message_content(&body).unwrap_or_default()
        };

        Ok(GenerationResult::from_raw_text(raw_text))
    }
}

/// Holds `generating = true` for as long as it lives.
///
/// Dropping the scope settles the state, so every exit path of a run
/// (including an unwinding panic) leaves `generating` false.
pub struct GenerationScope<'a> {
    state: &'a mut AppState,
}

impl<'a> GenerationScope<'a> {
    pub fn begin(state: &'a mut AppState) -> Self {
        state.apply(AppState::begin_generation);
        Self { state }
    }

    pub fn set_app_code(&mut self, app_code: Option<String>) {
        self.state.apply(|s| s.with_app_code(app_code));
    }
}

impl Drop for GenerationScope<'_> {
    fn drop(&mut self) {
        self.state.apply(AppState::settle);
    }
}

/// Capture the current page, ask the relay for an app and store the result.
///
/// Every failure is reported through `notifier` and returned; none escape
/// as a panic or leave the state marked as generating.
pub async fn generate_app<C, N>(
    state: &mut AppState,
    canvas: &C,
    relay: &RelayClient,
    notifier: &N,
    settings: &GenerateSettings,
) -> std::result::Result<String, GenerateError>
where
    C: Canvas + ?Sized,
    N: Notifier + ?Sized,
{
    let fail = |err: GenerateError| {
        notifier.error(&err.user_message());
        Err(err)
    };

    let Some(api_key) = state.api_key().map(str::to_string) else {
        return fail(GenerateError::MissingApiKey);
    };

    let image_data_url = match canvas.page_data_url(&settings.export) {
        Ok(Some(url)) => url,
        Ok(None) => return fail(GenerateError::MissingPage),
        Err(err) => {
            log::error!("Failed to capture page: {err:#}");
            return fail(GenerateError::Unexpected(err.to_string()));
        }
    };

    let mut scope = GenerationScope::begin(state);

    let request = build_request(&AppRequest {
        api_key: &api_key,
        model: &settings.model,
        user_text: &settings.user_text,
        image_data_url: &image_data_url,
        max_tokens: settings.max_tokens,
        stream: settings.stream,
    });
    log::debug!("Sending {request:?}");

    match relay.send(&request).await {
        Ok(GenerationResult {
            extracted_code: Some(code),
            ..
        }) => {
            scope.set_app_code(Some(code.clone()));
            notifier.success("App generated successfully");
            Ok(code)
        }
        Ok(result) => {
            log::warn!(
                "Model reply had no HTML block ({} chars)",
                result.raw_text.len()
            );
            scope.set_app_code(None);
            fail(GenerateError::NoCodeGenerated)
        }
        Err(err) => {
            log::error!("Generation failed: {err}");
            fail(err)
        }
    }
}
