//! Chartify Views - summary views over workforce & allocation data.
//!
//! Flat people/allocation records go in; the count, average, time-series and
//! promotion-flow shapes that chart rendering adapters consume come out.

pub mod config;
pub mod data;
pub mod stats;
