pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{AssignType, AuthUser, LoginAccount};
pub use requests::LoginRequest;
pub use responses::{LoginResponse, RefreshTokenResponse, UserInfoResponse};
