//! Library components of the reclaim CLI.

pub mod config;
pub mod logging;
pub mod pipeline;
