pub mod barrier;
pub mod chunk;
pub mod dispatcher;

pub use barrier::CompletionBarrier;
pub use chunk::{Chunk, ChunkState};
pub use dispatcher::{DispatchStats, Dispatched, Dispatcher};
