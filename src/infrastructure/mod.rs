//! Infrastructure layer: I/O implementations, process launching and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod launcher;
pub mod traits;

pub use di::ServiceContainer;
pub use error::{InfraError, InfraResult};
