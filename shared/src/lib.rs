//! Shared domain types and aggregation engines for the Exam Production
//! Tracking Platform
//!
//! This crate holds everything the backend computes in memory: the
//! entity models, the pipeline resolver, the weighted-completion
//! aggregator, the per-stage pipeline statistics engine and the
//! production-status derivers. It performs no I/O, which keeps the
//! aggregation logic directly testable.

pub mod completion;
pub mod models;
pub mod pipeline;
pub mod production_status;
pub mod statistics;
pub mod types;
pub mod validation;

pub use completion::*;
pub use models::*;
pub use pipeline::*;
pub use production_status::*;
pub use statistics::*;
pub use types::*;
pub use validation::*;
