//! In-process caches

mod memory_cache;
mod query_cache;

pub use memory_cache::MemoryCache;
pub use query_cache::InMemoryQueryCache;
