pub mod cache;
pub mod cli;
pub mod config;
pub mod http;
pub mod json;
pub mod log;
pub mod text;
