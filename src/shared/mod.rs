pub mod config;
pub mod error;

pub use config::{AppConfig, FeedConfig, OverlayConfig};
pub use error::{AppError, Result};
