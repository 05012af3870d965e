//! Console log sink
//!
//! Every line the reporter prints goes through [`Logger`], which prefixes it
//! with the component tag and mirrors it to the `log` facade.

use colored::*;
use serde::Serialize;
use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

pub const DEFAULT_TAG: &str = "test-logs-reporter";

/// A value that can be written to the console
#[derive(Debug, Clone, PartialEq)]
pub enum LogMessage {
    /// Scalar text, printed as-is
    Text(String),
    /// A mapping or record, pretty-printed as JSON
    Structured(serde_json::Value),
}

impl LogMessage {
    /// Build a message from anything that can be represented as a record.
    ///
    /// Falls back to the `Debug` form when serialization fails.
    pub fn record<T: Serialize + Debug + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::from(value),
            Err(e) => {
                log::debug!("Failed to serialize log record: {}", e);
                Self::Text(format!("{:?}", value))
            }
        }
    }

    /// Render the message body without the tag
    pub fn render(&self) -> String {
        match self {
            LogMessage::Text(text) => text.clone(),
            LogMessage::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

impl From<&str> for LogMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for LogMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<serde_json::Value> for LogMessage {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => Self::Structured(value),
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Tagged console writer
#[derive(Clone)]
pub struct Logger {
    tag: String,
    out: SharedWriter,
}

impl Logger {
    /// Logger writing to stdout
    pub fn stdout(tag: &str) -> Self {
        Self::with_writer(tag, Box::new(io::stdout()))
    }

    pub fn with_writer(tag: &str, out: Box<dyn Write + Send>) -> Self {
        Self {
            tag: tag.to_string(),
            out: Arc::new(Mutex::new(out)),
        }
    }

    /// Write one tagged entry. Never fails.
    pub fn log(&self, message: impl Into<LogMessage>) {
        let body = message.into().render();
        log::info!("[{}] {}", self.tag, body);

        let line = format!("[{}] {}", self.tag.cyan(), body);
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            log::warn!("Failed to write to console: {}", e);
        }
    }
}

/// In-memory writer for inspecting console output in tests
#[cfg(test)]
#[derive(Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CaptureBuffer {
    pub fn logger(&self) -> Logger {
        Logger::with_writer(DEFAULT_TAG, Box::new(self.clone()))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(|l| l.to_string()).collect()
    }
}

#[cfg(test)]
impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_message_is_prefixed_with_tag() {
        let buffer = CaptureBuffer::default();
        buffer.logger().log("hello");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].contains(DEFAULT_TAG));
        assert!(lines[0].ends_with("] hello"));
    }

    #[test]
    fn test_object_value_is_structured() {
        let message = LogMessage::from(json!({"testcase": "Login flow"}));
        assert!(matches!(message, LogMessage::Structured(_)));
        assert!(message.render().contains("\"testcase\": \"Login flow\""));
    }

    #[test]
    fn test_scalar_values_use_text_form() {
        assert_eq!(LogMessage::from(json!("plain")), LogMessage::Text("plain".to_string()));
        assert_eq!(LogMessage::from(json!(42)), LogMessage::Text("42".to_string()));
        assert_eq!(LogMessage::from(json!(null)), LogMessage::Text("null".to_string()));
    }

    #[test]
    fn test_record_serializes_struct() {
        #[derive(Debug, Serialize)]
        struct Sample {
            name: &'static str,
        }

        let message = LogMessage::record(&Sample { name: "x" });
        assert_eq!(message, LogMessage::Structured(json!({"name": "x"})));
    }

    #[test]
    fn test_record_falls_back_to_debug() {
        use std::collections::HashMap;

        // Non-string map keys cannot become JSON objects
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");

        let message = LogMessage::record(&map);
        match message {
            LogMessage::Text(text) => assert!(text.contains("pair")),
            other => panic!("expected text fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_clones_share_output() {
        let buffer = CaptureBuffer::default();
        let logger = buffer.logger();
        let clone = logger.clone();

        logger.log("first");
        clone.log("second");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("second"));
    }
}
