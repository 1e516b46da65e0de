//! Core trait abstractions for the lot scout library.
//!
//! These traits define the seams where network access, request pacing and
//! comparable-price sources plug in, so tests can swap in mocks.

pub mod comps;
pub mod fetcher;
pub mod pacer;
