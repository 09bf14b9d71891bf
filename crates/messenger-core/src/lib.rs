//! # Messenger Core
//!
//! Core types, entities, and error definitions for the messenger directory
//! service. Every other crate in the workspace builds on these abstractions.

pub mod domain;
pub mod error;
pub mod filter;
pub mod id;
pub mod pagination;
pub mod result;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use filter::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use validation::*;
