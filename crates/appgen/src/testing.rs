//! Local HTTP fixtures shared by the relay and orchestrator tests.

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// A URL on a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1/chat/completions")
}

/// A minimal chat-completion response carrying `content`.
pub fn chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "Llama-3.2-11B-Vision-Instruct",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[derive(Debug, Clone)]
pub enum UpstreamReply {
    Json(Value),
    Status(u16, &'static str),
    Chunks(Vec<&'static str>),
}

#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub body: Value,
}

/// Canned chat-completion endpoint that records what it was sent.
#[derive(Debug, Clone)]
pub struct MockUpstream {
    reply: Arc<UpstreamReply>,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    /// Start the mock and return it with the URL to post to.
    pub async fn start(reply: UpstreamReply) -> (Self, String) {
        let mock = Self {
            reply: Arc::new(reply),
            captured: Arc::default(),
        };
        let router = Router::new()
            .route("/v1/chat/completions", post(respond))
            .layer(DefaultBodyLimit::disable())
            .with_state(mock.clone());
        let base = spawn(router).await;
        (mock, format!("{base}/v1/chat/completions"))
    }

    pub fn calls(&self) -> usize {
        self.captured.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Captured> {
        self.captured.lock().unwrap().last().cloned()
    }
}

async fn respond(
    State(mock): State<MockUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    mock.captured.lock().unwrap().push(Captured {
        authorization,
        body,
    });

    match mock.reply.as_ref() {
        UpstreamReply::Json(value) => Json(value.clone()).into_response(),
        UpstreamReply::Status(status, text) => {
            (StatusCode::from_u16(*status).unwrap(), *text).into_response()
        }
        UpstreamReply::Chunks(chunks) => {
            let stream = futures::stream::iter(
                chunks
                    .clone()
                    .into_iter()
                    .map(|chunk| Ok::<_, Infallible>(Bytes::from_static(chunk.as_bytes()))),
            );
            Body::from_stream(stream).into_response()
        }
    }
}
