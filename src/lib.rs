pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod model;
pub mod notify;
pub mod prompt;
pub mod session;
pub mod types;

#[cfg(test)]
pub mod testing;
