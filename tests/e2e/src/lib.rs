//! Cadence End-to-End Test Support
//!
//! - `harness`: isolated stores with on-disk snapshots
//! - `mocks`: card factories and pre-built scenarios

pub mod harness;
pub mod mocks;

pub use harness::{init_tracing, TestStoreManager};
pub use mocks::{TestDataFactory, TestScenario};
