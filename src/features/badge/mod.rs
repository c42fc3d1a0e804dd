pub mod handler;
pub mod models;
pub mod renderer;

// Re-exports for external use (main.rs, OpenAPI, tests)
pub use handler::create_badge_router;
pub use models::{BadgeOverrides, BadgeSpec};
pub use renderer::render_badge;
