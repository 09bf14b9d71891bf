//! Data transfer objects.

mod address_dto;
mod page_dto;
mod user_dto;

pub use address_dto::*;
pub use page_dto::*;
pub use user_dto::*;
