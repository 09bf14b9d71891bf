//! # Messenger Service
//!
//! Orchestrates existence checks, lookups, creation, deletion and the
//! filtered paginated listing of users and their addresses.

pub mod dto;
pub mod r#impl;
pub mod mappers;
pub mod resolver;
pub mod user_service;

pub use dto::*;
pub use r#impl::UserServiceImpl;
pub use resolver::PaginationResolver;
pub use user_service::*;
