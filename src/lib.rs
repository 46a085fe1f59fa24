pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;

#[cfg(test)]
pub mod testing;
