//! HTTP API test suite.
//!
//! Exercises the incident, assignment, profile, user, and stats endpoints
//! end to end against a real PostgreSQL database. `DATABASE_URL` selects the
//! database (default: the development connection string); when none is
//! reachable every test skips itself.
//!
//! Run with: cargo test --test api

mod test_helpers;

mod test_assignment;
mod test_incidents;
mod test_profiles;
