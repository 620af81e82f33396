//! Shared CLI argument types

mod common;
mod global;

pub use common::{OutputFormat, resolve_date};
pub use global::GlobalOptions;
