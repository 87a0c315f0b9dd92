pub mod auth;
pub mod cars;
pub mod config;
pub mod editor;
