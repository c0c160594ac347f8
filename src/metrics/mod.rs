//! Extraction of metrics from `powermetrics` sampling units.
//!
//! Each submodule owns one family of lines. Extractors are pure: they take
//! the previous snapshot and a unit of text and return the next snapshot,
//! leaving any field whose line failed to parse at its previous value.

pub mod cpu;
pub mod gpu;
pub mod memory;
pub mod netdisk;
pub mod process;
pub mod snapshot;
