//! Background loops.

pub mod region_refresh_loop;
