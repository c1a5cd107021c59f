//! Business logic services for the Exam Production Tracking Platform

pub mod auth;
pub mod catch_view;
pub mod completion;
pub mod dispatch;
pub mod project;
pub mod reporting;
pub mod snapshot;
pub mod statistics;
pub mod transaction;

pub use auth::AuthService;
pub use catch_view::CatchViewService;
pub use completion::CompletionService;
pub use dispatch::DispatchService;
pub use project::ProjectService;
pub use reporting::ReportingService;
pub use statistics::StatisticsService;
pub use transaction::TransactionService;
