pub mod memory_repo;
pub mod mongo;
pub mod mongo_todo_repo;
pub mod mongo_user_repo;
