//! Test infrastructure for the lifecycle runners.
//!
//! Scenario tests are organized by runner, with shared mocks in
//! [`mocks`] and sequence properties in [`properties`].

pub mod console;

pub use mocks::{MockDaemon, MockHost};
