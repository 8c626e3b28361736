//! Splitting a raw status stream into lines.

/// Outcome of pushing one byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// The byte was buffered.
    Accumulating,
    /// A terminator completed this line; the buffer is empty again.
    LineReady(String),
}

/// Line splitter treating both `\r` and `\n` as terminators.
///
/// ffmpeg rewrites its status line in place with a bare carriage return,
/// so ordinary line reading would only see progress once the process ends.
/// Bytes are decoded per finished line, which keeps multi-byte characters
/// intact: neither terminator can occur inside a UTF-8 sequence.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes one byte of the stream.
    pub fn push(&mut self, byte: u8) -> Feed {
        match byte {
            b'\r' | b'\n' => {
                let line = String::from_utf8_lossy(&self.buffer).into_owned();
                self.buffer.clear();
                Feed::LineReady(line)
            }
            other => {
                self.buffer.push(other);
                Feed::Accumulating
            }
        }
    }

    /// Bytes buffered since the last terminator.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Drops any unterminated tail.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &str) -> Vec<String> {
        let mut buffer = LineBuffer::new();
        input
            .bytes()
            .filter_map(|b| match buffer.push(b) {
                Feed::LineReady(line) => Some(line),
                Feed::Accumulating => None,
            })
            .collect()
    }

    #[test]
    fn test_splits_on_cr_and_lf() {
        assert_eq!(lines("a\rb\nc\r"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_crlf_yields_empty_line() {
        assert_eq!(lines("a\r\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_unterminated_tail_stays_pending() {
        let mut buffer = LineBuffer::new();
        for b in "done\rtail".bytes() {
            buffer.push(b);
        }
        assert_eq!(buffer.pending(), b"tail");
        buffer.clear();
        assert!(buffer.pending().is_empty());
    }

    #[test]
    fn test_multibyte_characters_survive() {
        assert_eq!(lines("Påske æøå\n"), vec!["Påske æøå"]);
    }
}
