//! CLI command implementations

pub mod review;
pub mod serve;

pub use review::ReviewArgs;
pub use serve::ServeArgs;
