pub mod overlay;
pub mod post;

pub use overlay::{OverlaySnapshot, PostOptions, VoteEntry};
pub use post::Post;
