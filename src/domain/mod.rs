pub mod constants;
pub mod entities;
pub mod value_objects;

pub use constants::{DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_THRESHOLD, POSTS_COLLECTION};
pub use entities::{OverlaySnapshot, Post, PostOptions, VoteEntry};
pub use value_objects::{OptionKind, OrderSpec, PostId, ScopeId, SortKey, UserId, VoteValue};
