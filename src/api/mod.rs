mod cached;
mod client;
mod types;

pub use cached::{CachedClient, CacheTtls};
pub use client::{HttpClient, TvdbClient};
pub use types::{normalize_order, ApiConfig, ApiError, Episode, Series};
