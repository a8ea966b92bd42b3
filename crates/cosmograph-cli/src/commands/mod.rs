//! Command implementations.

pub mod extract;
pub mod patterns;
pub mod stats;

pub use self::extract::execute_extract;
pub use self::patterns::execute_patterns;
pub use self::stats::execute_stats;
