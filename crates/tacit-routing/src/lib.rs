//! # tacit-routing
//!
//! Specialists score a query against their vocabulary and the knowledge base
//! search that already ran for it; the router picks which specialists answer
//! and merges what they return.

pub mod merge;
pub mod policy;
pub mod router;
pub mod specialist;

pub use merge::merge_matches;
pub use policy::{RoutingPolicy, SpecialistKind};
pub use router::{Dispatch, Router, Routing};
pub use specialist::{Specialist, SpecialistOutput};
