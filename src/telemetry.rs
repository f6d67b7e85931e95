// file: src/telemetry.rs
// version: 1.1.0
// guid: 0ac5e6c9-8db1-4893-99b9-75d29d1f4077

//! Usage telemetry spans for command invocations

use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Fixed classification recorded on failed commands. Error details never
/// reach telemetry.
pub const UNKNOWN_ERROR: &str = "UnknownError";

/// Event name for a command path.
///
/// The path is built from declared command names only, root to leaf, so the
/// set of event names is fixed at build time and safe to emit.
pub fn command_event_name(command_path: &str) -> String {
    format!("cmd.{}", command_path.replace(' ', "."))
}

/// Starts spans for command invocations.
pub trait Tracer: Send + Sync {
    fn start(&self, event_name: &str) -> Box<dyn SpanHandle>;
}

/// A live span. Dropping the handle ends the span.
pub trait SpanHandle: Send {
    /// Record error status with a generic classification.
    fn set_error_status(&mut self, classification: &str);

    /// Backing `tracing` span for instrumenting the command future, when the
    /// tracer has one.
    fn tracing_span(&self) -> tracing::Span {
        tracing::Span::none()
    }
}

/// Tracer backed by the process-wide `tracing` subscriber.
pub struct TracingTracer;

struct TracingSpanHandle {
    span: tracing::Span,
}

impl Tracer for TracingTracer {
    fn start(&self, event_name: &str) -> Box<dyn SpanHandle> {
        let invocation_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "command",
            cmd = %event_name,
            invocation_id = %invocation_id,
            otel.status_code = tracing::field::Empty,
            error = tracing::field::Empty,
        );
        Box::new(TracingSpanHandle { span })
    }
}

impl SpanHandle for TracingSpanHandle {
    fn set_error_status(&mut self, classification: &str) {
        self.span.record("otel.status_code", "ERROR");
        self.span.record("error", classification);
    }

    fn tracing_span(&self) -> tracing::Span {
        self.span.clone()
    }
}

/// In-memory tracer that records span lifecycles instead of emitting them.
/// Lets callers assert when spans start, fail and close.
#[derive(Clone, Default)]
pub struct RecordingTracer {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
}

/// One recorded span.
#[derive(Debug, Clone)]
pub struct SpanRecord {
    pub event_name: String,
    pub error_classification: Option<String>,
    pub closed: bool,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every span started so far.
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.spans.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Tracer for RecordingTracer {
    fn start(&self, event_name: &str) -> Box<dyn SpanHandle> {
        let spans = self.spans.clone();
        let index = {
            let mut list = spans.lock().unwrap_or_else(|e| e.into_inner());
            list.push(SpanRecord {
                event_name: event_name.to_string(),
                error_classification: None,
                closed: false,
            });
            list.len() - 1
        };
        Box::new(RecordingSpanHandle { spans, index })
    }
}

struct RecordingSpanHandle {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
    index: usize,
}

impl SpanHandle for RecordingSpanHandle {
    fn set_error_status(&mut self, classification: &str) {
        let mut list = self.spans.lock().unwrap_or_else(|e| e.into_inner());
        list[self.index].error_classification = Some(classification.to_string());
    }
}

impl Drop for RecordingSpanHandle {
    fn drop(&mut self) {
        let mut list = self.spans.lock().unwrap_or_else(|e| e.into_inner());
        list[self.index].closed = true;
    }
}
