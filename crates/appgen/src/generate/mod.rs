mod canvas;
mod notify;
mod orchestrator;

pub use canvas::{Canvas, PngCanvas};
pub use notify::{ConsoleNotifier, Notifier};
pub use orchestrator::{generate_app, GenerateSettings, GenerationScope, RelayClient};

use crate::prelude::{eprintln, println, *};
use appgen_core::export::ExportOptions;
use appgen_core::prompt::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_USER_TEXT};
use appgen_core::state::AppState;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(name = "generate")]
#[command(about = "Generate an HTML app from a rendered diagram page")]
pub struct App {
    /// PNG rendering of the current diagram page
    #[arg(long, env = "APPGEN_IMAGE")]
    pub image: Option<PathBuf>,

    /// Relay endpoint the request is posted to
    #[arg(
        long,
        env = "APPGEN_RELAY_URL",
        default_value = "http://127.0.0.1:4321/api/proxy"
    )]
    pub relay_url: String,

    /// API key for the chat-completion service
    #[arg(long, env = "APPGEN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Vision model to ask
    #[arg(long, env = "APPGEN_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Token budget for the reply
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Have the relay stream the reply and return it accumulated
    #[arg(long)]
    pub stream: bool,

    /// What to build, in your own words
    #[arg(long, default_value = DEFAULT_USER_TEXT)]
    pub prompt: String,

    /// Write the generated HTML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export scale of the page image
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Export the page on a dark background
    #[arg(long)]
    pub dark: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let mut state = AppState::new();
    if let Some(api_key) = &app.api_key {
        state.apply(|s| s.with_api_key(api_key.as_str()));
    }

    let settings = GenerateSettings {
        model: app.model,
        user_text: app.prompt,
        max_tokens: Some(app.max_tokens),
        stream: app.stream,
        export: ExportOptions {
            scale: app.scale,
            dark: app.dark,
            ..ExportOptions::default()
        },
    };

    if global.verbose {
        eprintln!("Relay: {}", app.relay_url);
        eprintln!("Model: {}", settings.model);
        eprintln!("Stream: {}", settings.stream);
    }

    let canvas = PngCanvas::new(app.image);
    let relay = RelayClient::new(reqwest::Client::new(), app.relay_url);

    let code = generate_app(&mut state, &canvas, &relay, &ConsoleNotifier, &settings)
        .await
        .map_err(|err| eyre!(err))?;

    match app.output {
        Some(path) => {
            tokio::fs::write(&path, &code)
                .await
                .with_context(|| f!("Failed to write {}", path.display()))?;
            if global.verbose {
                eprintln!("Wrote {} bytes to {}", code.len(), path.display());
            }
        }
        None => println!("{code}"),
    }

    Ok(())
}
