pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, chunk_ranges};
pub use pool::WorkerPool;
