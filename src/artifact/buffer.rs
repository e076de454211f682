use bytes::Bytes;
use std::mem;

/// Ordered, append-only fragments of the recording in progress
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    fragments: Vec<Bytes>,
    total_bytes: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment in arrival order. Empty fragments are dropped.
    ///
    /// Returns whether the fragment was kept.
    pub fn append(&mut self, fragment: Bytes) -> bool {
        if fragment.is_empty() {
            return false;
        }
        self.total_bytes += fragment.len();
        self.fragments.push(fragment);
        true
    }

    /// Take every buffered fragment, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<Bytes> {
        self.total_bytes = 0;
        mem::take(&mut self.fragments)
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
        self.total_bytes = 0;
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }
}
