//! Cold-start reward priors for model selection.
//!
//! Gives a bandit-style selector an informed starting point for arms
//! it has never pulled: benchmark measurements where they exist,
//! discounted family inheritance where they do not, and a uniform
//! Beta(1, 1) when nothing is known.

pub mod benchmark;
pub mod beta;
pub mod family;
pub mod service;

pub use benchmark::BenchmarkTable;
pub use family::FamilyGraph;
pub use service::ColdStartPriors;
