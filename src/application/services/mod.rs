pub mod feed_composer;
pub mod feed_session;
pub mod live_updates;
pub mod optimistic_update;
pub mod pagination;
pub mod post_action_service;

pub use feed_composer::{FeedComposer, RenderablePost};
pub use feed_session::FeedSession;
pub use live_updates::LiveScoreUpdater;
pub use optimistic_update::{OptimisticUpdate, OptionUpdate, UpdateState, VoteUpdate};
pub use pagination::{
    CursorState, PageLoad, PageOutcome, PaginationController, ScrollDecision, SkipReason,
    scroll_decision,
};
pub use post_action_service::PostActionService;
