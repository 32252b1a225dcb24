//! # Common Test Utilities
//!
//! `TestApp` spawns the real server on a random port with both upstream
//! services (OCR and chat completions) mocked by one `httpmock::MockServer`,
//! and with private staging and output directories.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use docstruct_server::{
    config::{self, AppConfig},
    router,
    state::build_app_state,
};
use httpmock::{Method::POST, Mock, MockServer};
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde_json::{json, Value};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const OCR_PATH: &str = "/v1/ocr";
pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const MISTRAL_KEY: &str = "test-mistral-key";
pub const OPENAI_KEY: &str = "test-openai-key";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub temp_dir: PathBuf,
    pub output_dir: PathBuf,
    _work_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with the default test configuration.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns the server after `configure` has adjusted the loaded configuration.
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;
        let work_dir = tempdir()?;
        let temp_dir = work_dir.path().join("temp");
        let output_dir = work_dir.path().join("output");

        let config_path = work_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
mistral_api_key: "{MISTRAL_KEY}"
openai_api_key: "{OPENAI_KEY}"
ocr:
  api_url: "{}"
  model: "mistral-ocr-latest"
llm:
  api_url: "{}"
  model: "gpt-4o"
temp_dir: "{}"
output_dir: "{}"
request_timeout_secs: 1
"#,
            mock_server.url(OCR_PATH),
            mock_server.url(CHAT_PATH),
            temp_dir.display(),
            output_dir.display(),
        );
        fs::write(&config_path, config_content)?;

        let mut config = config::get_config(config_path.to_str())?;
        // Environment variables outrank the file; these must match the mocks.
        config.mistral_api_key = MISTRAL_KEY.to_string();
        config.openai_api_key = OPENAI_KEY.to_string();
        config.ocr.api_url = mock_server.url(OCR_PATH);
        config.llm.api_url = mock_server.url(CHAT_PATH);
        config.temp_dir = temp_dir.clone();
        config.output_dir = output_dir.clone();
        config.request_timeout_secs = Some(1);
        config.strict_validation = false;
        config.llm.json_mode = false;
        config.retry.max_attempts = 1;
        configure(&mut config);
        let app_state = build_app_state(config).await?;

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

        tokio::time::sleep(Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            temp_dir,
            output_dir,
            _work_dir: work_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Uploads `data` as the `file` part of a multipart request to `/ingest`.
    pub async fn upload(&self, file_name: &str, data: Vec<u8>) -> Result<reqwest::Response> {
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);
        Ok(self
            .client
            .post(format!("{}/ingest", self.address))
            .multipart(form)
            .send()
            .await?)
    }

    /// Mocks a successful OCR answer with one page of `markdown`.
    pub async fn mock_ocr_success(&self, markdown: &str) -> Mock<'_> {
        let body = json!({
            "pages": [{"index": 0, "markdown": markdown}],
            "model": "mistral-ocr-latest"
        });
        let auth = format!("Bearer {MISTRAL_KEY}");
        self.mock_server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(OCR_PATH)
                    .header("authorization", auth.as_str());
                then.status(200).json_body(body.clone());
            })
            .await
    }

    /// Mocks a chat completion whose message content is `content`.
    pub async fn mock_chat_success(&self, content: &str) -> Mock<'_> {
        let body = chat_completion_body(content);
        let auth = format!("Bearer {OPENAI_KEY}");
        self.mock_server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(CHAT_PATH)
                    .header("authorization", auth.as_str());
                then.status(200).json_body(body.clone());
            })
            .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// The body of a chat completion answering with `content`.
pub fn chat_completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

/// Number of entries in `dir`, or zero if it does not exist.
pub fn count_entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
