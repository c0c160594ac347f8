//! Terminal performance monitor for Apple Silicon, fed by a `powermetrics`
//! line stream.

pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod metrics;
pub mod sampler;
pub mod soc;
pub mod throttle;
pub mod ui;
