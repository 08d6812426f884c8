pub mod error;
pub mod fs;
pub mod path;
pub mod warnings;

pub use error::{AlvuError, BoxResult, Result};
pub use warnings::{Deprecation, DeprecationWarnings};
