//! User store implementations

mod memory;

pub use memory::MemoryUserStore;
