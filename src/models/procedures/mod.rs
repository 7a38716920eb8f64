pub mod entities;

pub use entities::{PagedRows, ProcMessage};
