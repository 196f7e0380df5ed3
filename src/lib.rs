pub mod config;
pub mod error;
pub mod registry;
pub mod storage;
pub mod sweep;
pub mod utils;

pub use crate::config::Config;
pub use crate::error::{DocumentError, Result, SweepError};
