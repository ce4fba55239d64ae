//! Compute module - battle simulation, estimation, fitness, and search.

mod battle;
mod estimator;
mod fitness;
mod partition;
mod search;

pub use battle::*;
pub use estimator::*;
pub use fitness::*;
pub use partition::*;
pub use search::*;
