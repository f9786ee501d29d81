#![allow(dead_code, unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: descriptor builders and raw reflection dumps for two variants
//! - `assertions`: assertion helpers with readable failure messages

pub mod assertions;
pub mod fixtures;

pub use assertions::{assert_contains, assert_error_contains, assert_not_contains, read_stub};
pub use fixtures::{
    class, class_ref, dump_a, dump_b, id, prop, struct_ref, write_dump, write_dumps,
};
