//! Schema module - scenario, roster, and search configuration types.

mod config;
mod roster;

pub use config::*;
pub use roster::*;
