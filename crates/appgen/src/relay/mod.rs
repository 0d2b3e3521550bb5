mod server;
mod upstream;

pub use server::{router, RelayState};

use crate::prelude::{eprintln, *};
use appgen_core::envelope::Overrides;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.sambanova.ai/v1/chat/completions";

/// Paths the relay answers on. The second one is kept for older front-ends.
pub const PROXY_PATH: &str = "/api/proxy";
pub const LEGACY_PROXY_PATH: &str = "/api/sambanova-proxy";

#[derive(Debug, clap::Parser)]
#[command(name = "relay")]
#[command(about = "Forward generation requests to the chat-completion API")]
pub struct App {
    /// Port to listen on
    #[arg(short, long, env = "APPGEN_PORT", default_value = "4321")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "APPGEN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Chat-completion endpoint every request is forwarded to
    #[arg(long, env = "APPGEN_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Replace the caller's model with this one
    #[arg(long, env = "APPGEN_FORCE_MODEL")]
    pub force_model: Option<String>,

    /// Pin the stream flag (and therefore the relay mode) regardless of the caller
    #[arg(long, env = "APPGEN_FORCE_STREAM")]
    pub force_stream: Option<bool>,
}

/// Settings shared by every relay request.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub upstream_url: String,
    pub overrides: Overrides,
}

impl RelayConfig {
    pub fn new(upstream_url: impl Into<String>) -> Self {
        Self {
            upstream_url: upstream_url.into(),
            overrides: Overrides::default(),
        }
    }
}

impl From<&App> for RelayConfig {
    fn from(app: &App) -> Self {
        Self {
            upstream_url: app.upstream_url.clone(),
            overrides: Overrides {
                model: app.force_model.clone(),
                stream: app.force_stream,
            },
        }
    }
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let addr = format!("{}:{}", app.host, app.port);
    let config = RelayConfig::from(&app);

    if global.verbose {
        eprintln!("Upstream: {}", config.upstream_url);
        if let Some(model) = &config.overrides.model {
            eprintln!("Forcing model: {model}");
        }
        if let Some(stream) = config.overrides.stream {
            eprintln!("Forcing stream: {stream}");
        }
    }

    let state = RelayState::new(config)?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Relay listening on http://{addr}{PROXY_PATH}");
    if global.verbose {
        eprintln!("Relay listening on http://{}", addr);
        eprintln!("Proxy endpoint: http://{}{}", addr, PROXY_PATH);
    }

    axum::serve(listener, router(state))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}
