pub mod cache;
pub mod document_gateway;

pub use cache::{CacheLookup, FeedCache};
pub use document_gateway::{
    ChangeCallback, DocumentChange, DocumentGateway, DocumentSubscription, GatewayError,
};
