pub mod ports;
pub mod services;

pub use services::{FeedComposer, FeedSession, PaginationController, PostActionService};
