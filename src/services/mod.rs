// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{RecordKey, RecordStore, Records, StoreError, Table};
