//! Server-sent events framing for streamed completions.

/// One complete event from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// Payload of the `data:` lines
    Data(String),
    /// The `[DONE]` terminator
    Done,
}

/// Incremental decoder. Feed it body chunks as they arrive; it returns
/// every event completed by that chunk.
///
/// Bytes are buffered until a blank line, so multi-byte characters split
/// across network chunks are decoded intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer
            .extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut frames = Vec::new();
        while let Some(end) = find(&self.buffer, b"\n\n") {
            let event: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(frame) = parse_event(&String::from_utf8_lossy(&event[..end])) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Decode whatever is left once the body has ended.
    pub fn finish(&mut self) -> Option<SseFrame> {
        let rest = std::mem::take(&mut self.buffer);
        parse_event(String::from_utf8_lossy(&rest).trim_end())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// `event:`, `id:`, `retry:` and comment lines carry nothing we use.
fn parse_event(event: &str) -> Option<SseFrame> {
    let data: Vec<&str> = event
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|d| d.strip_prefix(' ').unwrap_or(d))
        .collect();
    if data.is_empty() {
        return None;
    }

    let data = data.join("\n");
    if data.trim() == "[DONE]" {
        Some(SseFrame::Done)
    } else {
        Some(SseFrame::Data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"a\":").is_empty());
        assert_eq!(
            decoder.push(b"1}\n\ndata: [DONE]\n\n"),
            vec![SseFrame::Data("{\"a\":1}".into()), SseFrame::Done]
        );
    }

    #[test]
    fn test_crlf_comments_and_other_fields() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b": keep-alive\r\n\r\nevent: message\r\nid: 7\r\ndata:{\"b\":2}\r\n\r\n");
        assert_eq!(frames, vec![SseFrame::Data("{\"b\":2}".into())]);
    }

    #[test]
    fn test_multibyte_character_split_between_chunks() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: \"héllo\"\n\n".as_bytes();
        // Split inside the two-byte 'é'
        let cut = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;
        assert!(decoder.push(&bytes[..cut]).is_empty());
        assert_eq!(decoder.push(&bytes[cut..]), vec![SseFrame::Data("\"héllo\"".into())]);
    }

    #[test]
    fn test_trailing_event_without_blank_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: [DONE]\n").is_empty());
        assert_eq!(decoder.finish(), Some(SseFrame::Done));
        assert_eq!(decoder.finish(), None);
    }
}
