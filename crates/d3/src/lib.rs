//! # U-Packing 3D
//!
//! Three-dimensional bin packing for the U-Packing engine.
//!
//! Items are rotatable boxes placed into identical bins by a corner-point
//! heuristic. A First Fit Decreasing packing serves as the starting point for
//! local search and simulated annealing, both of which explore the solution
//! space through swap, move, rebalance, merge and consolidate operators.
//!
//! ## Quick Start
//!
//! ```rust
//! use u_packing_d3::{first_fit_decreasing, Item, LocalSearch};
//!
//! let items = vec![
//!     Item::new(0, 8.0, 6.0, 4.0),
//!     Item::new(1, 7.0, 5.0, 4.0),
//!     Item::new(2, 3.0, 3.0, 2.0),
//! ];
//! let initial = first_fit_decreasing((10.0, 8.0, 6.0), items);
//! let best = LocalSearch::new(100, false).solve(&initial);
//! assert!(best.fitness() <= initial.fitness());
//! ```

pub mod boundary;
pub mod constructive;
pub mod geometry;
pub mod local_search;
pub mod operators;
pub mod packer;
pub mod placement;
pub mod sa_packing;
pub mod solution;

// Re-exports
pub use boundary::{Bin, BinSpec};
pub use constructive::{first_fit_decreasing, pack_unassigned};
pub use geometry::{Item, ItemSpec, Rotation};
pub use local_search::LocalSearch;
pub use operators::{Neighborhood, NeighborhoodConfig, Operator, OperatorWeights};
pub use packer::Packer3D;
pub use placement::{find_position, pack_items_in_bin, repack_bin, PackOutcome, PlacementCandidate};
pub use sa_packing::SimulatedAnnealing;
pub use solution::{FitnessWeights, Solution};
pub use u_packing_core::{Config, Error, Placement, Result, Statistics, Strategy};
