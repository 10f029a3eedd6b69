// src/processing/mod.rs
//! Signal conditioning for single-channel EMG recordings

pub mod filters;
pub mod pipeline;
pub mod summary;

pub use filters::{FilterOutcome, FilteredSignal};
pub use pipeline::*;
pub use summary::*;
