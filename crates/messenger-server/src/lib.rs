//! # Messenger Server Library
//!
//! Wiring, logging setup and startup helpers for the `messenger-server`
//! binary.

pub mod app;
pub mod logging;
pub mod startup;
