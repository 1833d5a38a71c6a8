//! Test support shared by unit and integration tests.

pub mod log;

pub use log::init_global_test_logging;
