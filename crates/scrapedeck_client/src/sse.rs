//! Incremental decoder for `text/event-stream` bodies.
//!
//! Only `data` fields matter to the log stream; `event`, `id`, `retry` and
//! comment lines are skipped.

/// Splits a byte stream into event payloads.
///
/// Chunks may end anywhere, including inside a line or a UTF-8 sequence.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the payloads of every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=newline).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if let Some(payload) = self.process_line(&String::from_utf8_lossy(&line)) {
                events.push(payload);
            }
        }

        events
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            let payload = self.data.join("\n");
            self.data.clear();
            // An event with no data at all (`data:` alone) is not dispatched.
            return (!payload.is_empty()).then_some(payload);
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }
}
