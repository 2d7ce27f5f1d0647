use async_trait::async_trait;
use axum::response::sse::Event;
use chrono::Local;
use serde::Serialize;
use serde_json::json;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Advisory severity attached to each progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

/// One streamed status update: `{"message": ..., "level": ...}` on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub message: String,
    pub level: Level,
}

/// Capability the pipeline stages report through.
///
/// Writes are fire-and-forget: the stages never wait on the caller and a
/// dropped client connection must not fail the run. The SSE transport and
/// the in-memory recorder used by tests both implement this.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn emit(&self, message: String, level: Level);

    /// Write one final structured event (if any) and end the stream.
    async fn close(&self, final_payload: Option<serde_json::Value>);
}

/// Local wall-clock timestamp prefixed to user-facing progress messages.
pub fn local_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// SSE-backed sink. Events are pushed into an unbounded channel consumed
/// by the response body stream, so `emit` never blocks on the client.
pub struct SseSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl SseSink {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    fn send_json(&self, value: serde_json::Value) {
        let event = Event::default().data(value.to_string());
        // Client may be gone; that is not our problem to report.
        let _ = self.tx.send(event);
    }
}

#[async_trait]
impl ProgressSink for SseSink {
    async fn emit(&self, message: String, level: Level) {
        self.send_json(json!({ "message": message, "level": level }));
    }

    async fn close(&self, final_payload: Option<serde_json::Value>) {
        if let Some(result) = final_payload {
            self.send_json(json!({
                "timestamp": local_timestamp(),
                "result": result,
            }));
        }
        // Stream terminates when the last sender is dropped by the runner task.
    }
}

/// In-memory recorder for tests: captures the ordered event log and the
/// final payload.
#[derive(Default)]
pub struct RecordingSink {
    inner: Mutex<Recorded>,
}

#[derive(Default)]
struct Recorded {
    events: Vec<ProgressEvent>,
    closed: bool,
    final_payload: Option<serde_json::Value>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    pub fn final_payload(&self) -> Option<serde_json::Value> {
        self.inner.lock().unwrap().final_payload.clone()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn emit(&self, message: String, level: Level) {
        self.inner.lock().unwrap().events.push(ProgressEvent { message, level });
    }

    async fn close(&self, final_payload: Option<serde_json::Value>) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        inner.final_payload = final_payload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), "\"warn\"");
    }

    #[test]
    fn event_wire_shape() {
        let event = ProgressEvent {
            message: "Downloading TSV files from S3...".to_string(),
            level: Level::Info,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"message": "Downloading TSV files from S3...", "level": "info"})
        );
    }

    #[tokio::test]
    async fn recorder_keeps_order_and_final_payload() {
        let sink = RecordingSink::new();
        sink.emit("one".to_string(), Level::Info).await;
        sink.emit("two".to_string(), Level::Error).await;
        sink.close(Some(serde_json::json!({"ok": true}))).await;

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "one");
        assert_eq!(events[1].level, Level::Error);
        assert!(sink.is_closed());
        assert_eq!(sink.final_payload(), Some(serde_json::json!({"ok": true})));
    }

    #[tokio::test]
    async fn sse_sink_survives_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let sink = SseSink::new(tx);
        // Must not panic or error: writes are fire-and-forget.
        sink.emit("client went away".to_string(), Level::Info).await;
        sink.close(None).await;
    }
}
