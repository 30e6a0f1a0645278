//! Incremental Server-Sent Events decoder.
//!
//! Follows the browser EventSource parsing rules: `data:` lines of one event
//! are joined with `\n`, lines starting with `:` are comments, unknown fields
//! are ignored, and a blank line dispatches the event. Both LF and CRLF line
//! endings are accepted. An event cut off by the end of the stream is dropped.

/// One dispatched SSE event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    /// `event:` field; `None` for the default `message` type.
    pub event: Option<String>,
    pub data: String,
    pub id: Option<String>,
}

impl SseFrame {
    /// Whether this frame would reach an EventSource `onmessage` handler.
    pub fn is_message(&self) -> bool {
        matches!(self.event.as_deref(), None | Some("message"))
    }
}

/// Byte-oriented decoder; feed it chunks as they arrive.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
    event: Option<String>,
    id: Option<String>,
    started: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk and return every frame it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let mut line = String::from_utf8_lossy(&line).into_owned();
            if !self.started {
                self.started = true;
                if let Some(stripped) = line.strip_prefix('\u{feff}') {
                    line = stripped.to_string();
                }
            }
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }

        frames
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame {
            event,
            data,
            id: self.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"data: {\"stage\":\"analyzing\"}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "{\"stage\":\"analyzing\"}");
        assert!(frames[0].is_message());
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"da").is_empty());
        assert!(decoder.push(b"ta: hel").is_empty());
        assert!(decoder.push(b"lo\n").is_empty());
        let frames = decoder.push(b"\n");
        assert_eq!(frames[0].data, "hello");
    }

    #[test]
    fn test_multiline_data_and_crlf() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"data: a\r\ndata:b\r\n\r\ndata: c\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].data, "a\nb");
        assert_eq!(frames[1].data, "c");
    }

    #[test]
    fn test_comments_and_keep_alive_are_ignored() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b": keep-alive\n\n:ping\n\nretry: 1000\n\n");
        assert!(frames.is_empty());
    }

    #[test]
    fn test_named_events_are_not_messages() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"event: complete\ndata: {}\nid: 4\n\ndata: x\n\n");
        assert_eq!(frames.len(), 2);
        assert!(!frames[0].is_message());
        assert_eq!(frames[0].event.as_deref(), Some("complete"));
        assert_eq!(frames[0].id.as_deref(), Some("4"));
        assert!(frames[1].is_message());
        assert_eq!(frames[1].id.as_deref(), Some("4"));
    }

    #[test]
    fn test_unterminated_frame_is_held_back() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: partial\n").is_empty());
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let text = "data: 授课计划\n\n".as_bytes();
        let (a, b) = text.split_at(8);
        assert!(decoder.push(a).is_empty());
        let frames = decoder.push(b);
        assert_eq!(frames[0].data, "授课计划");
    }

    #[test]
    fn test_leading_bom_is_stripped() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push("\u{feff}data: x\n\n".as_bytes());
        assert_eq!(frames[0].data, "x");
    }
}
