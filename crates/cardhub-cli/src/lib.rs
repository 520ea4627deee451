//! Command-line front end of the hub.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;
