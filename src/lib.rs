pub mod auth;
pub mod error;
pub mod http;
pub mod logger;
pub mod plan;
pub mod probe;
pub mod report;
pub mod sink;

// Re-export commonly used types
pub use error::{Result, RuprobeError};
pub use probe::{Classification, Outcome, ProbeRunner, RequestDescriptor, SessionConfig};
