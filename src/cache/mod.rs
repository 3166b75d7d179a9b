mod store;
mod types;

pub use store::CacheStore;
pub use types::{CacheEntry, CacheError};
