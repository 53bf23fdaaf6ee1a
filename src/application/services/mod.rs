//! Application services
//!
//! Services depend on I/O boundary traits and can be tested with mocks.

pub mod document;
pub mod toolset;

pub use document::DocumentService;
pub use toolset::{LaunchRequest, ToolsetService};
