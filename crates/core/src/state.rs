use std::fmt;

/// Application state the orchestrator reads and updates.
///
/// Every transition consumes the state and returns the next one, so callers
/// holding a `&mut AppState` go through [`AppState::apply`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AppState {
    api_key: Option<String>,
    pub generating: bool,
    pub app_code: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank keys are stored as "not configured".
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = if api_key.trim().is_empty() {
            None
        } else {
            Some(api_key)
        };
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Marks a run as in progress and drops the previous result.
    pub fn begin_generation(mut self) -> Self {
        self.generating = true;
        self.app_code = None;
        self
    }

    pub fn with_app_code(mut self, app_code: Option<String>) -> Self {
        self.app_code = app_code;
        self
    }

    /// Marks the current run as finished, whatever its result.
    pub fn settle(mut self) -> Self {
        self.generating = false;
        self
    }

    pub fn clear_app_code(self) -> Self {
        self.with_app_code(None)
    }

    /// Runs a transition in place.
    pub fn apply(&mut self, transition: impl FnOnce(Self) -> Self) {
        *self = transition(std::mem::take(self));
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("generating", &self.generating)
            .field("app_code", &self.app_code.as_ref().map(String::len))
            .finish()
    }
}
