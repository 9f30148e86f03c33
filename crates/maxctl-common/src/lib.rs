pub mod error;
pub mod humanize;
pub mod time;

pub use error::{MaxctlError, Result};
