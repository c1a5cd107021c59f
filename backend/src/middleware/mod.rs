//! Middleware for the Exam Production Tracking Platform

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
