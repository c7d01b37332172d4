pub mod client;
pub mod handler;
pub mod registry;
pub mod staging;

// Re-exports for external use (main.rs, OpenAPI, etc.)
pub use client::RelayClient;
pub use handler::{create_relay_router, list_uploaders, relay_upload};
pub use registry::UploaderRegistry;
pub use staging::{StagedFile, StagingArea};
