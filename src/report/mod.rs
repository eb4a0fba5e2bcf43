pub mod printer;
pub mod summary;

pub use printer::ProbeReporter;
pub use summary::RunSummary;
