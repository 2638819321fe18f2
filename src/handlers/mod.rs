pub mod active;
pub mod admin;
