//! Growable byte buffer
//!
//! A contiguous byte store that grows by reallocation. Anything that hands
//! out positions into a `ByteBuffer` must hand out offsets, because growth
//! moves the storage and invalidates every borrowed view.

use std::fmt;

/// A reallocating byte buffer with append and reserve-then-commit operations.
///
/// `length` bytes are valid; `capacity` bytes are allocated. When an append
/// would not fit, capacity grows to `2 * capacity + requested`.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
    storage: Vec<u8>,
    length: usize,
}

impl ByteBuffer {
    /// Creates an empty buffer with `initial_capacity` bytes allocated.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            storage: vec![0; initial_capacity],
            length: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The valid bytes, `[0, len)`.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.length]
    }

    /// Guarantees at least `n` writable bytes after the current end and
    /// returns them.
    ///
    /// Nothing becomes valid until [`commit`](Self::commit) is called with
    /// the number of bytes actually written.
    pub fn reserve(&mut self, n: usize) -> &mut [u8] {
        if self.length + n > self.storage.len() {
            let grown = self.storage.len() * 2 + n;
            self.storage.resize(grown, 0);
        }
        &mut self.storage[self.length..self.length + n]
    }

    /// Marks `n` reserved bytes as written.
    pub fn commit(&mut self, n: usize) {
        assert!(
            self.length + n <= self.storage.len(),
            "commit past reserved capacity"
        );
        self.length += n;
    }

    pub fn append(&mut self, data: &[u8]) {
        self.reserve(data.len()).copy_from_slice(data);
        self.length += data.len();
    }

    pub fn append_byte(&mut self, c: u8) {
        self.reserve(1)[0] = c;
        self.length += 1;
    }

    pub fn append_str(&mut self, s: &str) {
        self.append(s.as_bytes());
    }

    /// Drops everything past `n`. Has no effect if `n >= len`.
    pub fn truncate_to(&mut self, n: usize) {
        self.length = self.length.min(n);
    }

    /// Empties the buffer and shrinks the allocation down to
    /// `target_capacity` if it has grown beyond it.
    pub fn reset(&mut self, target_capacity: usize) {
        self.length = 0;
        if self.storage.len() > target_capacity {
            self.storage.truncate(target_capacity);
            self.storage.shrink_to_fit();
        }
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl fmt::Write for ByteBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_follows_doubling_rule() {
        let mut buf = ByteBuffer::with_capacity(4);
        buf.append(b"abcd");
        assert_eq!(buf.capacity(), 4);

        buf.append(b"ef");
        assert_eq!(buf.capacity(), 4 * 2 + 2);
        assert_eq!(buf.as_slice(), b"abcdef");
    }

    #[test]
    fn reserve_then_commit_only_exposes_written_bytes() {
        let mut buf = ByteBuffer::with_capacity(2);
        let space = buf.reserve(8);
        assert_eq!(space.len(), 8);
        space[..3].copy_from_slice(b"xyz");
        buf.commit(3);

        assert_eq!(buf.as_slice(), b"xyz");
    }

    #[test]
    fn reset_shrinks_oversized_storage() {
        let mut buf = ByteBuffer::with_capacity(16);
        buf.append(&[7u8; 100]);
        buf.reset(16);

        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 16);
    }
}
