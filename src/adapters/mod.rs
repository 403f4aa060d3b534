// Adapters layer: concrete storage backends behind the `Storage` port.

pub mod memory;
pub mod storage;

pub use memory::MemoryStorage;
pub use storage::LocalStorage;
