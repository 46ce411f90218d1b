pub mod auth;
pub mod chat;
pub mod report;

pub use auth::*;
