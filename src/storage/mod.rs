pub mod models;
pub mod sinks;

pub use models::ValidLine;
pub use sinks::OutputSinks;
