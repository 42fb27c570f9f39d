pub mod manager;
pub mod models;
pub mod repository;
pub mod todos;
pub mod users;

pub use manager::{DatabaseManager, StoreError};
pub use repository::Repository;
