// Service exports
pub mod document_store;
pub mod match_service;
pub mod memory;
pub mod postgres;
pub mod source;

pub use document_store::{DocumentStoreClient, DocumentStoreConfig};
pub use match_service::{MatchDefaults, MatchOutcome, MatchService, strip_breakdown};
pub use memory::InMemoryProfiles;
pub use postgres::PostgresProfileStore;
pub use source::{ProfileSource, StoreError};
