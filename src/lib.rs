//! Cribar - benchmark report generator for approximate-membership filters
//!
//! This library ingests the CSV measurement files emitted by filter
//! benchmark harnesses (blocked bloom, cuckoo, quotient, xor), reduces
//! repeated trials to summary statistics, and renders comparison charts
//! for load-factor, thread-scaling, negative-share, and space-accuracy
//! sweeps.

pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod loader;
pub mod record;
pub mod report;
pub mod series;
