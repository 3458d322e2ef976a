pub mod feed_cache;
pub mod overlay_store;

pub use feed_cache::FeedCacheService;
pub use overlay_store::PostOverlayStore;
