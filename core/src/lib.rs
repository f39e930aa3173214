pub mod clipboard;
pub mod core;
pub mod types;
