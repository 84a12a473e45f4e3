//! Shared library surface for the route planning server and its tests.

pub mod api;
pub mod backoff;
pub mod cache;
pub mod config;
pub mod loops;
pub mod regions;
pub mod state;
