//! HTTP handlers for all web routes.

pub mod classify;
pub mod describe;
pub mod health;
