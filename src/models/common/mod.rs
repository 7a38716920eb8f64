pub mod pagination;
pub mod response;

pub use pagination::{ListResponse, PaginationQuery};
pub use response::ApiResponse;
