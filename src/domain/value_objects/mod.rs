pub mod option_kind;
pub mod order_spec;
pub mod post_id;
pub mod scope_id;
pub mod user_id;
pub mod vote_value;

pub use option_kind::OptionKind;
pub use order_spec::{OrderSpec, SortKey};
pub use post_id::PostId;
pub use scope_id::ScopeId;
pub use user_id::UserId;
pub use vote_value::VoteValue;
