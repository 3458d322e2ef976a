pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::ports::{CacheLookup, DocumentGateway, FeedCache, GatewayError};
pub use application::services::{FeedSession, PageOutcome, RenderablePost};
pub use shared::{AppConfig, AppError, Result};

/// ログ設定の初期化。`RUST_LOG` が無ければ既定のフィルタを使う
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // 既に初期化済みなら何もしない
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "community_feed=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
