//! # Common Test Utilities
//!
//! `TestApp` spawns a real server on a random port. Its AI provider is an
//! OpenAI-compatible endpoint served by an `httpmock::MockServer`, so every test
//! controls exactly what the "model" answers.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::{Method::POST, Mock, MockServer};
use mcqgen_server::{
    config, router,
    state::{build_app_state, AppState},
};
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde_json::json;
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const CHAT_PATH: &str = "/v1/chat/completions";

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .try_init();
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with the default generation settings.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_generation("").await
    }

    /// Spawns the application server. `generation_yaml` is appended to the
    /// config file, e.g. to lower `max_questions` for a test.
    pub async fn spawn_with_generation(generation_yaml: &str) -> Result<Self> {
        setup_tracing();
        let mock_server = MockServer::start_async().await;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
providers:
  default:
    provider: "local"
    api_url: "{}"
    api_key: null
    model_name: "mock-chat-model"
    timeout_secs: 5
{generation_yaml}
"#,
            mock_server.url(CHAT_PATH)
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config_path = config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("temp config path is not valid UTF-8"))?;
        let config = config::get_config(Some(config_path))?;
        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Mocks the chat completions endpoint to answer every call with `content`.
    pub async fn mock_chat_reply(&self, content: &str) -> Mock<'_> {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        });
        self.mock_server
            .mock_async(|when, then| {
                when.method(POST).path(CHAT_PATH);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(body);
            })
            .await
    }

    /// Mocks the chat completions endpoint to fail with `status`.
    pub async fn mock_chat_failure(&self, status: u16, body: &str) -> Mock<'_> {
        let body = body.to_string();
        self.mock_server
            .mock_async(|when, then| {
                when.method(POST).path(CHAT_PATH);
                then.status(status).body(body);
            })
            .await
    }

    /// Posts a multipart form to `/generate_quiz` with the query string `query`.
    pub async fn post_quiz(&self, form: Form, query: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/generate_quiz{query}", self.address))
            .multipart(form)
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A form with `pdf_file` set to `data` under `file_name`.
pub fn pdf_form(file_name: &str, data: Vec<u8>) -> Form {
    Form::new().part(
        "pdf_file",
        Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .expect("static mime type is valid"),
    )
}
