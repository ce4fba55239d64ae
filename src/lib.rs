//! Trilane - robust three-lane roster partitioning.
//!
//! Splits a fixed pool of units into three equal lanes so the split holds up
//! against an adversary who chooses which of its own three lanes each of
//! yours must fight. A stochastic attrition simulator estimates lane-vs-lane
//! win probabilities, and a genetic algorithm searches the space of pool
//! permutations for the partition with the best worst-case outcome.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Scenario, roster, and search configuration types
//! - `compute`: Battle simulation, probability estimation, fitness, and the
//!   search engine
//!
//! # Example
//!
//! ```rust,no_run
//! use trilane::compute::SearchEngine;
//! use trilane::schema::{AdversaryTeam, Scenario, SearchConfig};
//!
//! let scenario = Scenario {
//!     pool: (0u32..60).map(|i| 1300 + i * 20).collect(),
//!     adversary: AdversaryTeam {
//!         left: (0u32..20).map(|i| 1350 + i * 10).collect(),
//!         middle: (0u32..20).map(|i| 1450 + i * 30).collect(),
//!         right: (0u32..20).map(|i| 1470 + i * 30).collect(),
//!     },
//!     search: SearchConfig::default(),
//! };
//!
//! let mut engine = SearchEngine::new(scenario).expect("valid scenario");
//! let result = engine.run_with_callback(|progress| {
//!     println!(
//!         "Generation {}: best fitness = {:.3}",
//!         progress.generation + 1,
//!         progress.best_fitness
//!     );
//! });
//!
//! println!("Best total fitness: {:.3}", result.record.total);
//! for lane in result.lanes() {
//!     println!("{lane:?}");
//! }
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{FitnessRecord, SearchEngine, SearchResult};
pub use schema::{AdversaryTeam, LaneId, Scenario, SearchConfig};
