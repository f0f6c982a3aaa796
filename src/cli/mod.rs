pub mod commands;
pub mod handlers;
pub mod prompt;
