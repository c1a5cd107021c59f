//! HTTP handlers for the Exam Production Tracking Platform

pub mod auth;
pub mod catch_view;
pub mod completion;
pub mod dispatch;
pub mod health;
pub mod project;
pub mod reporting;
pub mod statistics;
pub mod transaction;

pub use auth::*;
pub use catch_view::*;
pub use completion::*;
pub use dispatch::*;
pub use health::*;
pub use project::*;
pub use reporting::*;
pub use statistics::*;
pub use transaction::*;
