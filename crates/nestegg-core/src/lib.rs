pub mod error;
pub mod rates;
pub mod types;

pub mod bonds;
pub mod growth;
pub mod retirement;
pub mod strategy;

pub use error::ProjectionError;
pub use types::*;

/// Standard result type for all projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;
