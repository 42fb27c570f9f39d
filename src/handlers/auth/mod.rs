pub mod logout;
pub mod register;

// Re-export handler functions for use in routing
pub use logout::logout;
pub use register::register;
