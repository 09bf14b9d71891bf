//! Paged listing DTO.

use crate::UserResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One page of users.
///
/// `page_number` and `page_size` echo the request. When the listing was
/// filtered by address, the totals count matching addresses, not users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPageResponse {
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub total_elements: u64,
    pub content: Vec<UserResponse>,
}
