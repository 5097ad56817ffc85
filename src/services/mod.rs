//! Application services.
//!
//! Workflows that combine storage with the scheduler, shared by the HTTP
//! handlers and usable without them.

pub mod goals;
pub mod study;
