//! Benchmark suite for U-Packing
//!
//! This crate provides:
//! - Built-in reference instances and a JSON instance parser
//! - Benchmark runner over the FFD, local search and annealing strategies
//! - Result recording and comparison

mod dataset;
mod parser;
mod result;
mod runner;

pub use dataset::{builtin_instance, builtin_instances, Dataset, DatasetInfo};
pub use parser::{DatasetParser, ParseError};
pub use result::{BenchmarkResult, RunResult, StrategySummary};
pub use runner::{BenchmarkConfig, BenchmarkRunner};
