//! # Structuring Stage Tests
//!
//! These tests drive `Structurer` with a mock chat model to verify the
//! prompt contract and the parse-only acceptance of model answers.

use docstruct::{
    prompts::{STRUCTURING_SYSTEM_PROMPT, STRUCTURING_USER_PREFIX},
    IngestError, OcrTranscript, RetryPolicy, Structurer,
};
use docstruct_test_utils::{helpers::sample_structured_document, MockAiProvider};
use reqwest::StatusCode;
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log lines in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// An empty transcript must fail without the model ever being called.
#[tokio::test]
async fn test_empty_transcript_skips_model() {
    let ai = MockAiProvider::new();
    let structurer = Structurer::new(Box::new(ai.clone()));

    let result = structurer.structure(&OcrTranscript::from_text("")).await;

    assert!(matches!(result, Err(IngestError::Structuring(_))));
    assert_eq!(ai.call_count(), 0);
}

/// A transcript containing only whitespace counts as empty.
#[tokio::test]
async fn test_whitespace_transcript_skips_model() {
    let ai = MockAiProvider::new();
    let structurer = Structurer::new(Box::new(ai.clone()));

    let result = structurer
        .structure(&OcrTranscript::from_text("  \n\n "))
        .await;

    assert!(result.is_err());
    assert_eq!(ai.call_count(), 0);
}

/// The model receives the fixed system prompt and the transcript as the user turn.
#[tokio::test]
async fn test_prompts_sent_to_model() {
    let ai = MockAiProvider::new();
    ai.add_response(
        "Section 1: Intro",
        &sample_structured_document().to_string(),
    );
    let structurer = Structurer::new(Box::new(ai.clone()));

    let document = structurer
        .structure(&OcrTranscript::from_text("Section 1: Intro"))
        .await
        .expect("structuring should succeed");

    assert_eq!(document.0, sample_structured_document());
    let calls = ai.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, STRUCTURING_SYSTEM_PROMPT);
    assert_eq!(
        calls[0].1,
        format!("{STRUCTURING_USER_PREFIX}Section 1: Intro")
    );
}

/// A completion that is not JSON is a structuring error.
#[tokio::test]
async fn test_non_json_completion_is_rejected() {
    let ai = MockAiProvider::new();
    ai.add_response("malformed content", "Sure! Here is your document: {");
    let structurer = Structurer::new(Box::new(ai.clone()));

    let err = structurer
        .structure(&OcrTranscript::from_text("malformed content"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "structuring_error");
    assert!(err.to_string().contains("not valid JSON"), "got: {err}");
}

/// The text of a completion that fails to parse is logged at ERROR.
#[tokio::test]
async fn test_non_json_completion_is_logged() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::ERROR)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let ai = MockAiProvider::new();
    ai.add_response("garbled scan", "Sure! Here is your document: {");
    let structurer = Structurer::new(Box::new(ai));

    let result = structurer
        .structure(&OcrTranscript::from_text("garbled scan"))
        .await;
    assert!(result.is_err());

    let output = logs.contents();
    let line = output
        .lines()
        .find(|l| l.contains("Sure! Here is your document: {"))
        .unwrap_or_else(|| panic!("completion text not logged, got: {output}"));
    assert!(line.contains("ERROR"), "got: {line}");
}

/// Valid JSON that ignores the schema is accepted unchanged.
#[tokio::test]
async fn test_schema_violating_json_is_accepted() {
    let ai = MockAiProvider::new();
    ai.add_response("anything", r#"{"summary": "not the schema", "content": "oops"}"#);
    let structurer = Structurer::new(Box::new(ai));

    let document = structurer
        .structure(&OcrTranscript::from_text("anything"))
        .await
        .unwrap();

    assert_eq!(
        document.0,
        json!({"summary": "not the schema", "content": "oops"})
    );
}

/// A failing model call surfaces as a structuring error carrying the provider message.
#[tokio::test]
async fn test_model_failure_is_structuring_error() {
    let ai = MockAiProvider::new();
    ai.fail_with(StatusCode::UNAUTHORIZED, "invalid api key");
    let structurer = Structurer::new(Box::new(ai.clone()));

    let err = structurer
        .structure(&OcrTranscript::from_text("text"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Structuring(_)));
    assert!(err.to_string().contains("invalid api key"), "got: {err}");
    assert_eq!(ai.call_count(), 1);
}

/// With a retry policy, transient model failures are retried up to the attempt limit.
#[tokio::test]
async fn test_transient_model_failure_is_retried() {
    let ai = MockAiProvider::new();
    ai.fail_with(StatusCode::SERVICE_UNAVAILABLE, "overloaded");
    let structurer = Structurer::new(Box::new(ai.clone()))
        .with_retry(RetryPolicy::new(3, Duration::from_millis(1)));

    let result = structurer.structure(&OcrTranscript::from_text("text")).await;

    assert!(result.is_err());
    assert_eq!(ai.call_count(), 3);
}
