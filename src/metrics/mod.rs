pub mod collector;
pub mod sample;

// Re-export commonly used types
pub use collector::Collector;
pub use sample::{Intent, Sample, Stat, StatKind, Tags, Values, value};
