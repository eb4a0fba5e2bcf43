pub mod descriptor;
pub mod outcome;
pub mod runner;
pub mod session;

// Re-export commonly used types
pub use descriptor::RequestDescriptor;
pub use outcome::{Classification, Outcome, classify};
pub use runner::ProbeRunner;
pub use session::SessionConfig;
