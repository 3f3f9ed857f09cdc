//! Growable byte buffer with a sequential read cursor.

/// A growable byte buffer supporting append-for-write and cursor-for-read
/// usage.
///
/// The buffer is shared between the two transfer directions: an outbound
/// request body is appended once and then drained chunk by chunk through
/// [`read_next`](Self::read_next), while an inbound response is appended
/// chunk by chunk as the transport delivers it. Capacity grows on demand
/// and is retained across [`clear`](Self::clear).
///
/// Invariant: `read_cursor <= len() <= capacity()`.
#[derive(Debug, Default, Clone)]
pub struct ChunkBuffer {
    data: Vec<u8>,
    read_cursor: usize,
}

impl ChunkBuffer {
    /// Creates an empty buffer with no allocated capacity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            read_cursor: 0,
        }
    }

    /// Creates a buffer whose content is a copy of the given bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
            read_cursor: 0,
        }
    }

    /// Appends bytes at the end of the buffer, growing capacity if needed.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Resets length and read cursor to zero. Capacity is retained.
    pub fn clear(&mut self) {
        self.data.clear();
        self.read_cursor = 0;
    }

    /// Returns the number of valid bytes in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the allocated capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns all valid bytes, ignoring the read cursor.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns up to `max` bytes starting at the read cursor and advances
    /// the cursor past them.
    ///
    /// An empty slice means the buffer is exhausted. That is the
    /// end-of-input signal for the consumer, not an error, and repeated
    /// calls after exhaustion keep returning an empty slice.
    pub fn read_next(&mut self, max: usize) -> &[u8] {
        let start = self.read_cursor;
        let take = max.min(self.data.len() - start);
        self.read_cursor += take;
        &self.data[start..start + take]
    }

    /// Returns the bytes between the read cursor and the end of the
    /// buffer without advancing the cursor.
    #[must_use]
    pub fn unread(&self) -> &[u8] {
        &self.data[self.read_cursor..]
    }

    /// Advances the read cursor by `n` bytes, saturating at the end of
    /// the buffer.
    pub fn consume(&mut self, n: usize) {
        self.read_cursor = (self.read_cursor + n).min(self.data.len());
    }

    /// Returns the number of bytes not yet consumed through the cursor.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_cursor
    }

    /// Moves the read cursor back to the start of the buffer.
    pub fn reset_cursor(&mut self) {
        self.read_cursor = 0;
    }
}

impl From<&str> for ChunkBuffer {
    fn from(s: &str) -> Self {
        Self::from_slice(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let buf = ChunkBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_from_str_copies_content() {
        let buf = ChunkBuffer::from("hello");
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.as_slice(), b"hello");
    }

    #[test]
    fn test_length_tracks_appends() {
        let mut buf = ChunkBuffer::new();
        let chunks: [&[u8]; 4] = [b"ab", b"", b"cdef", b"g"];
        let mut total = 0;
        for chunk in chunks {
            buf.append(chunk);
            total += chunk.len();
            assert_eq!(buf.len(), total);
        }
        assert_eq!(buf.as_slice(), b"abcdefg");
    }

    #[test]
    fn test_read_next_reproduces_appended_sequence() {
        let mut buf = ChunkBuffer::new();
        buf.append(b"the quick brown fox");
        buf.append(b" jumps over");

        // Drain with odd chunk sizes and reassemble.
        for size in [1, 3, 7, 100] {
            buf.reset_cursor();
            let mut out = Vec::new();
            loop {
                let chunk = buf.read_next(size).to_vec();
                if chunk.is_empty() {
                    break;
                }
                out.extend_from_slice(&chunk);
            }
            assert_eq!(out, b"the quick brown fox jumps over");
        }
    }

    #[test]
    fn test_read_next_idempotent_after_exhaustion() {
        let mut buf = ChunkBuffer::from("xy");
        assert_eq!(buf.read_next(10), b"xy");
        assert_eq!(buf.read_next(10), b"");
        assert_eq!(buf.read_next(10), b"");
    }

    #[test]
    fn test_clear_retains_capacity() {
        let mut buf = ChunkBuffer::new();
        buf.append(&[0u8; 256]);
        let cap = buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_unread_and_consume() {
        let mut buf = ChunkBuffer::from("abcdef");
        assert_eq!(buf.unread(), b"abcdef");
        buf.consume(2);
        assert_eq!(buf.unread(), b"cdef");
        assert_eq!(buf.remaining(), 4);
        buf.consume(100);
        assert_eq!(buf.unread(), b"");
    }

    #[test]
    fn test_append_after_partial_read() {
        let mut buf = ChunkBuffer::from("abc");
        buf.consume(1);
        buf.append(b"de");
        assert_eq!(buf.unread(), b"bcde");
    }
}
