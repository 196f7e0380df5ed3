pub mod batch;
pub mod checker;
pub mod validity;

pub use batch::{BatchRunner, RunState, SweepSummary};
pub use checker::DocumentChecker;
pub use validity::{is_valid_date, is_valid_date_at, ExpiryValidator};
