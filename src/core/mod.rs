//! Core building blocks: file pairing, masked differencing, summary statistics
//! and the policy-driven comparison loop. These are the primitives consumed by
//! the high-level `api` module.
pub mod difference;
pub mod pairing;
pub mod params;
pub mod pipeline;
pub mod stats;
