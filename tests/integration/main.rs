//! Integration test harness.
//!
//! Every test drives the full router against a wiremock upstream.


mod auth_flow_test;
mod guard_test;
mod refresh_test;
