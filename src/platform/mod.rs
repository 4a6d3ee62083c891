//! Platform abstraction layer
//!
//! Browser/native differences behind small traits:
//! - Storage (LocalStorage on web, in-memory elsewhere)
//! - Monotonic time (`performance.now()` on web)

pub mod storage;
pub mod time;

pub use storage::{MemoryStorage, StorageBackend};
pub use time::system_clock;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
