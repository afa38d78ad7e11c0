//! Shared test helpers for the accounts backend.
//!
//! Logging initialization for unit and integration tests, and assertions for
//! the problem-details error contract. No dependency on backend types.

pub mod logging;
pub mod problem_details;
