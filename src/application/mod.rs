pub mod todo_service;
pub mod user_service;

#[cfg(test)]
mod todo_service_tests;
