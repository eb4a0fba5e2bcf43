pub mod model;
pub mod writer;

pub use model::DiscoveredRecord;
pub use writer::{DiscoveredSink, record_discovered};
