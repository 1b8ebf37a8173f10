// ABOUTME: Library root for zdd - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod commands;
pub mod config;
pub mod control_plane;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod hooks;
pub mod output;
pub mod registry;
pub mod types;
