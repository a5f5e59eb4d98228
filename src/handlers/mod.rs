/// Web API Handlers
///
/// Each handler extracts the request data, calls the shared
/// [`ProgressTracker`](crate::progress::ProgressTracker) and maps its errors
/// into [`ApiError`](crate::errors::ApiError) responses. Handlers are generic
/// over the progress store so the router can run on SQLite or in memory.

mod deck_handlers;
mod progress_handlers;
mod review_handlers;

// Re-export all handlers
pub use deck_handlers::*;
pub use progress_handlers::*;
pub use review_handlers::*;
