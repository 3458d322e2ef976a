pub mod cache;

pub use cache::{FeedCacheService, PostOverlayStore};
