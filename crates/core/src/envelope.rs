use serde_json::{Map, Value};
use std::fmt;

/// Key field sent by the orchestrator.
pub const API_KEY_FIELD: &str = "apiKey";

/// Older clients sent the key under this name; it is still honoured.
pub const LEGACY_API_KEY_FIELD: &str = "userApiKey";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("API key is required")]
    MissingApiKey,
}

/// How the relay hands the upstream response back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// Await the full JSON body and return it unchanged.
    Buffered,
    /// Read every streamed chunk, concatenate, return `{ "data": text }`.
    Accumulate,
}

impl fmt::Display for RelayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered => write!(f, "buffered"),
            Self::Accumulate => write!(f, "accumulate"),
        }
    }
}

/// Relay-side settings that take precedence over the caller's payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub model: Option<String>,
    pub stream: Option<bool>,
}

/// A relay payload split into the secret key and the body forwarded upstream.
#[derive(Clone, PartialEq)]
pub struct ProxyEnvelope {
    api_key: String,
    body: Map<String, Value>,
}

impl ProxyEnvelope {
    /// Take the key out of a caller payload.
    ///
    /// Anything other than a JSON object, or an object without a non-blank
    /// string key, is rejected. Everything else stays in the body untouched;
    /// `messages` is not validated.
    pub fn split(payload: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut body) = payload else {
            return Err(EnvelopeError::MissingApiKey);
        };

        let primary = body.remove(API_KEY_FIELD);
        let legacy = body.remove(LEGACY_API_KEY_FIELD);

        let api_key = [primary, legacy]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::String(key) if !key.trim().is_empty() => Some(key),
                _ => None,
            })
            .ok_or(EnvelopeError::MissingApiKey)?;

        Ok(Self { api_key, body })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// `stream: true` selects accumulate mode; anything else is buffered.
    pub fn mode(&self) -> RelayMode {
        match self.body.get("stream").and_then(Value::as_bool) {
            Some(true) => RelayMode::Accumulate,
            _ => RelayMode::Buffered,
        }
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(model) = &overrides.model {
            self.body
                .insert("model".to_string(), Value::String(model.clone()));
        }
        if let Some(stream) = overrides.stream {
            self.body.insert("stream".to_string(), Value::Bool(stream));
        }
    }

    pub fn into_parts(self) -> (String, Map<String, Value>) {
        (self.api_key, self.body)
    }
}

impl fmt::Debug for ProxyEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyEnvelope")
            .field("api_key", &"<redacted>")
            .field("fields", &self.body.keys().collect::<Vec<_>>())
            .finish()
    }
}
