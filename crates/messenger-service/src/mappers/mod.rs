//! Entity-DTO mappers.
//!
//! Single entities map through `From` impls on the DTOs; this module holds
//! the page assembly shared by both listing strategies.

use crate::dto::{UserPageResponse, UserResponse};
use messenger_core::{PageInfo, PageParams, User};

impl UserPageResponse {
    /// Assembles a page from the caller's parameters, the totals of the page
    /// that drove the listing, and the users to show.
    #[must_use]
    pub fn assemble(params: PageParams, info: PageInfo, users: Vec<User>) -> Self {
        Self {
            page_number: params.page_number,
            page_size: params.page_size,
            total_pages: info.total_pages,
            total_elements: info.total_elements,
            content: users.into_iter().map(UserResponse::from).collect(),
        }
    }
}
