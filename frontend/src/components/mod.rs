pub mod admin;
pub mod membership;
