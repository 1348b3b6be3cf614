//! dsolve benchmarking suite
//!
//! This crate contains benchmarks for graph registration and resolution
//! over generated graph shapes, with a petgraph baseline.

pub mod common;

pub use common::*;
