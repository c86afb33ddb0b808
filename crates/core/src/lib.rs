//! # U-Packing Core
//!
//! Core traits and abstractions for the U-Packing bin packing engine.
//!
//! This crate provides the problem-independent pieces that the 3D packing
//! crate builds on.
//!
//! ## Core Components
//!
//! - **Error type**: `Error` and the `Result` alias
//! - **Solver trait**: Common interface for packing solvers, plus `Config` and `Strategy`
//! - **SA framework**: Simulated annealing runner with pluggable cooling schedules
//! - **Local search framework**: Steepest-descent / first-improvement runner
//! - **AABB3D**: Axis-aligned boxes with strict overlap semantics
//! - **Statistics**: The summary record handed to reporting code
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod aabb;
pub mod error;
pub mod local_search;
pub mod placement;
pub mod result;
pub mod sa;
pub mod solver;

// Re-exports
pub use aabb::AABB3D;
pub use error::{Error, Result};
pub use local_search::{LsConfig, LsProblem, LsResult, LsRunner, PivotRule, Termination};
pub use placement::{BinId, ItemId, Placement, PlacementStats};
pub use result::{ConstraintViolations, Statistics};
pub use sa::{
    acceptance_probability, CoolingSchedule, SaConfig, SaProblem, SaResult, SaRunner, SaSolution,
};
pub use solver::{Config, Solver, Strategy};
