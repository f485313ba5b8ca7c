use heapless::Vec;

use crate::{config::JSON_BUFFER_SIZE, error::AppError};

/// Scratch space for one inbound JSON response, provisioned at `JSON_BUFFER_SIZE` bytes.
#[derive(Debug, Default)]
pub struct PayloadBuffer {
    bytes: Vec<u8, JSON_BUFFER_SIZE>,
}

impl PayloadBuffer {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub const fn capacity(&self) -> usize {
        JSON_BUFFER_SIZE
    }

    /// Append a received chunk. A chunk that does not fit is rejected whole.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), AppError> {
        self.bytes.extend_from_slice(chunk).map_err(|_| {
            log::error!(
                "Payload of {} bytes overflows {} byte buffer",
                self.bytes.len() + chunk.len(),
                JSON_BUFFER_SIZE
            );
            AppError::PayloadTooLarge {
                capacity: JSON_BUFFER_SIZE,
            }
        })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn remaining(&self) -> usize {
        JSON_BUFFER_SIZE - self.bytes.len()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_chunks() {
        let mut buf = PayloadBuffer::new();
        assert!(buf.is_empty());
        buf.push_chunk(b"{\"stationId\":").unwrap();
        buf.push_chunk(b"42}").unwrap();
        assert_eq!(buf.as_slice(), b"{\"stationId\":42}");
        assert_eq!(buf.remaining(), JSON_BUFFER_SIZE - 16);
    }

    #[test]
    fn fills_to_exact_capacity() {
        let mut buf = PayloadBuffer::new();
        buf.push_chunk(&[b' '; JSON_BUFFER_SIZE]).unwrap();
        assert_eq!(buf.len(), buf.capacity());
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn oversized_chunk_is_rejected_whole() {
        let mut buf = PayloadBuffer::new();
        buf.push_chunk(&[b'x'; JSON_BUFFER_SIZE - 1]).unwrap();
        assert_eq!(
            buf.push_chunk(b"yz"),
            Err(AppError::PayloadTooLarge {
                capacity: JSON_BUFFER_SIZE
            })
        );
        assert_eq!(buf.len(), JSON_BUFFER_SIZE - 1);

        buf.clear();
        assert!(buf.is_empty());
        buf.push_chunk(b"yz").unwrap();
    }
}
