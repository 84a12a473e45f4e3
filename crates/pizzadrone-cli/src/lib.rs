//! Pizza drone CLI - command line tools for the route planner.
//!
//! - plan_route: plan a delivery from a scenario file or the built-in
//!   Edinburgh demo, locally or against a running server

pub mod scenarios;

pub use scenarios::{edinburgh_demo, load_scenario, Scenario};
