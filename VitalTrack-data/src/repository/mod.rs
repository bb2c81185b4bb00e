// Repository module structure
pub mod errors;
mod in_memory;
mod reading;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStorage;
pub use reading::{ReadingRepository, ReadingRepositoryTrait};
pub use storage::DatabaseStorage;

#[cfg(any(test, feature = "mock"))]
pub use reading::mock;

#[cfg(feature = "mock")]
pub use reading::MockReadingRepositoryTrait;
