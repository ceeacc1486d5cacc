pub mod error;
pub mod id;
pub mod repository;
pub mod todo;
pub mod user;
