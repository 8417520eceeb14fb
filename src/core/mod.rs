//! Core types: errors, configuration, env-file and duration parsing.

pub mod config;
pub mod duration;
pub mod env_file;
pub mod errors;
