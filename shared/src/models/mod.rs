//! Domain models for the Exam Production Tracking Platform

mod dispatch;
mod event_log;
mod facility;
mod process;
mod project;
mod quantity_sheet;
mod transaction;
mod user;

pub use dispatch::*;
pub use event_log::*;
pub use facility::*;
pub use process::*;
pub use project::*;
pub use quantity_sheet::*;
pub use transaction::*;
pub use user::*;
