pub mod candidates;
pub mod config;
pub mod delivery;
pub mod judge;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod stats;
