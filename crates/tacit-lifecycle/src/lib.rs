//! # tacit-lifecycle
//!
//! Turns generated answers into reviewable candidates and applies reviewer
//! actions. Promotion to certified happens only through [`LifecycleManager::promote`].

pub mod dedup;
pub mod manager;
pub mod recommend;
pub mod transitions;

pub use manager::{CandidateRecord, LifecycleManager};
