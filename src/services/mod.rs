pub mod auth;
pub mod health;
pub mod procedures;

pub use auth::AuthService;
pub use health::HealthService;
pub use procedures::ProcedureService;
