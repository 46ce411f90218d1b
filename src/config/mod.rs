pub mod database;
pub mod email;
pub mod generative;
pub mod jwt;
