pub mod cli;
pub mod cookies;
pub mod core;
pub mod executor;
pub mod infrastructure;
pub mod services;
