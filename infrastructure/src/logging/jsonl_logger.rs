//! JSONL file writer for transcript events.
//!
//! Each [`TranscriptEvent`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to the file via a buffered writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use visionlink_application::ports::transcript_logger::{TranscriptEvent, TranscriptLogger};
use visionlink_domain::SessionId;

/// JSONL transcript logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlTranscriptLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTranscriptLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Open `<dir>/<session id>.transcript.jsonl`.
    pub fn in_directory(dir: impl AsRef<Path>, session: &SessionId) -> Option<Self> {
        Self::new(Self::file_path(dir, session))
    }

    pub fn file_path(dir: impl AsRef<Path>, session: &SessionId) -> PathBuf {
        dir.as_ref()
            .join(format!("{}.transcript.jsonl", session.as_str()))
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptLogger for JsonlTranscriptLogger {
    fn log(&self, event: TranscriptEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": event.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // A session can be abandoned by Ctrl-C at any point
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_event_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.transcript.jsonl");
        let logger = JsonlTranscriptLogger::new(&path).unwrap();

        logger.log(TranscriptEvent::new(
            "question",
            serde_json::json!({ "round": 1, "text": "sudden or gradual?" }),
        ));
        logger.log(TranscriptEvent::new(
            "answer",
            serde_json::json!({ "round": 1, "text": "gradual" }),
        ));
        drop(logger);

        let events = read_lines(&path);
        assert_eq!(events.len(), 2);
        for event in &events {
            assert!(event.get("timestamp").is_some());
        }
        assert_eq!(events[0]["type"], "question");
        assert_eq!(events[0]["round"], 1);
        assert_eq!(events[0]["text"], "sudden or gradual?");
        assert_eq!(events[1]["type"], "answer");
        assert_eq!(events[1]["text"], "gradual");
    }

    #[test]
    fn test_wraps_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jsonl");
        let logger = JsonlTranscriptLogger::new(&path).unwrap();

        logger.log(TranscriptEvent::new("note", serde_json::json!("just a string")));
        drop(logger);

        let events = read_lines(&path);
        assert_eq!(events[0]["type"], "note");
        assert_eq!(events[0]["data"], "just a string");
    }

    #[test]
    fn test_in_directory_names_file_after_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionId::new("triage-20260101T090000-1");
        let logger = JsonlTranscriptLogger::in_directory(dir.path().join("logs"), &session).unwrap();

        assert!(logger.path().ends_with("logs/triage-20260101T090000-1.transcript.jsonl"));
        assert!(logger.path().exists());
    }

    #[test]
    fn test_returns_none_when_path_is_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlTranscriptLogger::new(dir.path()).is_none());
    }
}
