pub mod error;
pub mod matcher;

// Re-export commonly used types
pub use error::EngineError;
pub use matcher::{Classification, StatementMatcher};
