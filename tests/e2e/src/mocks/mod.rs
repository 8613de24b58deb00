//! Test data


pub use fixtures::{BatchConfig, TestDataFactory, TestScenario};
