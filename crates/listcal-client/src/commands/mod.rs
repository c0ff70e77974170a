//! Command implementations.

pub mod config;
pub mod events;
pub mod show;
pub mod sources;
