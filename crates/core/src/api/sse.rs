//! Incremental decoder for the `text/event-stream` progress feed.
//!
//! The backend frames every event as a single `data:` line followed by a
//! blank line:
//!
//! ```text
//! data: {"type": "info", "timestamp": "14:02:11", "agent": "System", "message": "..."}
//!
//! data: {"type": "end", "message": "Stream closed"}
//!
//! ```
//!
//! Chunks may split a record (or a multi-byte character) anywhere, so bytes
//! are buffered until a full record is available.

use ad_protocol::event_models::ProgressEvent;

#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event completed by it.
    ///
    /// Comment lines and records whose data is not a progress event are
    /// skipped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ProgressEvent> {
        self.buffer
            .extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        let mut processed = 0;

        while let Some(end) = find_record_end(&self.buffer[processed..]) {
            let record_end = processed + end;
            if let Some(event) = parse_record(&self.buffer[processed..record_end]) {
                events.push(event);
            }
            processed = record_end + 2;
        }

        if processed > 0 {
            self.buffer.drain(..processed);
        }

        events
    }

    /// Decode whatever is left once the connection has closed.
    pub fn finish(&mut self) -> Option<ProgressEvent> {
        let rest = std::mem::take(&mut self.buffer);
        parse_record(&rest)
    }
}

fn find_record_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(2).position(|w| w == b"\n\n")
}

fn parse_record(record: &[u8]) -> Option<ProgressEvent> {
    let text = String::from_utf8_lossy(record);
    let mut data_lines = Vec::new();

    for line in text.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            data_lines.push(value);
        }
    }

    if data_lines.is_empty() {
        return None;
    }

    let data = data_lines.join("\n");
    match serde_json::from_str::<ProgressEvent>(&data) {
        Ok(event) => Some(event),
        Err(error) => {
            tracing::warn!(%error, data = %data, "skipping undecodable stream record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_protocol::event_models::EventKind;

    #[test]
    fn test_parses_complete_records() {
        let mut parser = SseParser::new();
        let events = parser.feed(
            b"data: {\"type\":\"info\",\"message\":\"a\"}\n\ndata: {\"type\":\"end\",\"message\":\"Stream closed\"}\n\n",
        );
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "a");
        assert_eq!(events[1].kind, EventKind::End);
    }

    #[test]
    fn test_record_split_across_chunks() {
        let payload = "data: {\"type\":\"agent_running\",\"agent\":\"GroupChat\",\"message\":\"⏳ Starting multi-agent discussion\"}\n\n";
        let bytes = payload.as_bytes();
        // Split inside the multi-byte hourglass character.
        let split = payload.find('⏳').unwrap() + 1;

        let mut parser = SseParser::new();
        assert!(parser.feed(&bytes[..split]).is_empty());
        let events = parser.feed(&bytes[split..]);

        assert_eq!(events.len(), 1);
        assert!(events[0].message.starts_with('⏳'));
    }

    #[test]
    fn test_crlf_comments_and_garbage_are_tolerated() {
        let mut parser = SseParser::new();
        let events = parser.feed(
            b": keep-alive\r\n\r\ndata: not json\r\n\r\nevent: progress\r\ndata: {\"type\":\"step\",\"message\":\"ok\"}\r\n\r\n",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Step);
    }

    #[test]
    fn test_finish_flushes_unterminated_record() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: {\"type\":\"complete\",\"message\":\"done\"}").is_empty());
        let last = parser.finish().unwrap();
        assert_eq!(last.kind, EventKind::Complete);
        assert!(parser.finish().is_none());
    }
}
