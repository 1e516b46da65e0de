//! Data types shared across adapters, comparables and the pipeline.

pub mod config;
pub mod lot;
pub mod outcome;
