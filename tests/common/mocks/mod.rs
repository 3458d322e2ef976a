pub mod document_gateway;
pub mod in_memory_gateway;

pub use document_gateway::*;
pub use in_memory_gateway::*;
