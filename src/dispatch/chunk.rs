//! Per-chunk dispatch state.

/// Lifecycle of a chunk: `Pending → InFlight → {Ready, Failed}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkState<T> {
    Pending,
    InFlight,
    Ready(T),
    Failed(String),
}

/// A unit of text sent to the enrichment service.
///
/// `id` is the only ordering key used when results are reassembled.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<T> {
    pub id: usize,
    pub text: String,
    pub state: ChunkState<T>,
}

impl<T> Chunk<T> {
    pub fn new(id: usize, text: String) -> Self {
        Self {
            id,
            text,
            state: ChunkState::Pending,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match &self.state {
            ChunkState::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            ChunkState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}
