//! CLI command handlers
//!
//! Handlers too large to live in main.rs.

pub mod init;
