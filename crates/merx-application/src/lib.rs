//! Application use cases for the MERX console.

pub mod auth_usecase;
pub mod context;
pub mod merchant_listing;
pub mod model_hierarchy;

pub use auth_usecase::AuthUseCase;
pub use context::ConsoleContext;
pub use merchant_listing::{MerchantListing, MerchantListingUseCase};
pub use model_hierarchy::{KnowledgeBaseNode, ModelHierarchyUseCase, ModelTree};
