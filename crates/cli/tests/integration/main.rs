//! CLI integration tests.

mod build_tests;
mod common;
mod routes_tests;
mod services_tests;
