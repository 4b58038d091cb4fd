pub mod collection;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod runner;
pub mod scheduler;

// Re-export commonly used types
pub use error::{Result, RuloadError};
pub use runner::{Runner, VirtualUser};
