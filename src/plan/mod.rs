pub mod loader;
pub mod types;

pub use loader::PlanLoader;
pub use types::{ProbeEntry, ProbePlan, SessionSection};
