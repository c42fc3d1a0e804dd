pub mod client;
pub mod models;

// Re-exports for external use (main.rs, cache, badge handler, tests)
pub use client::PlatformClient;
pub use models::{Platform, RatingResult};
