//! freqcache: a constant-time LFU cache with LRU tie-breaking.
//!
//! The engine lives in [`policy::lfu`]; the frequency bookkeeping it is built
//! on lives in [`ds`].

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;
