//! Model → KnowledgeBase → Document hierarchy and its relational resolver.

pub mod cache;
pub mod matching;
pub mod model;
pub mod resolver;
pub mod source;

pub use cache::ResolutionCache;
pub use matching::{ChildNode, ParentLink, links_to};
pub use model::{Document, KnowledgeBase, Model, ParentKey, ResourceLevel, ResourceNode};
pub use resolver::RelationalResolver;
pub use source::ChildSource;
