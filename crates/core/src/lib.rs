pub mod error;

pub use error::{CastPlanError, Result};
