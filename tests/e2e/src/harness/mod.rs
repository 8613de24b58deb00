//! Test harness
//!
//! Isolated card stores for end-to-end tests.

mod store_manager;

pub use store_manager::{init_tracing, TestStoreManager};
