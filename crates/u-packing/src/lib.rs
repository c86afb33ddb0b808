//! # U-Packing
//!
//! Three-dimensional bin packing engine.
//!
//! Packs rotatable rectangular items into the fewest identical bins using a
//! corner-point placement heuristic, First Fit Decreasing construction and
//! local search or simulated annealing improvement.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use u_packing::d3::{BinSpec, ItemSpec, Packer3D};
//! use u_packing::{Config, Solver, Strategy};
//!
//! let items = vec![ItemSpec::new(0, 8.0, 6.0, 4.0), ItemSpec::new(1, 3.0, 3.0, 2.0)];
//! let bin = BinSpec::new(10.0, 8.0, 6.0);
//!
//! let packer = Packer3D::new(Config::new().with_strategy(Strategy::LocalSearch));
//! let solution = packer.solve(&items, &bin)?;
//! println!("{:?}", solution.get_statistics());
//! ```
//!
//! ## Feature Flags
//!
//! - `d3` (default): 3D bin packing algorithms
//! - `serde`: Serialization support

/// Core traits and abstractions.
pub use u_packing_core as core;

/// 3D bin packing algorithms.
#[cfg(feature = "d3")]
pub use u_packing_d3 as d3;

// Re-export commonly used types at root level
pub use u_packing_core::{Config, Error, Placement, Result, Solver, Statistics, Strategy};
