//! Database models for the Exam Production Tracking Platform
//!
//! Re-exports models from the shared crate; report row types live with
//! the services that produce them

pub use shared::models::*;
