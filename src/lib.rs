//! # 42 tools - project manager for 42 school C projects
//!
//! A thin front end over the tools a 42 C project already uses: `make` and
//! `cc` to build, `norminette` to check style, `valgrind` to check memory.
//!
//! ## Quick Start
//!
//! ```bash
//! # Set up a project that links the libft folder next to it
//! 42 init --libft
//!
//! # Build (norminette first) and run with arguments
//! 42 run -- input.txt
//!
//! # Debug build, run under valgrind
//! 42 run --debug
//! ```
//!
//! ## Module Organization
//!
//! - [`build`] - Makefile generation and the compile / run pipeline
//! - [`commands`] - CLI command handlers (`init`)
//! - [`exec`] - External program invocation
//! - [`upgrade`] - Update check and self-update

/// Makefile generation, compilation and running.
pub mod build;

/// Style checking (norminette).
pub mod checker;

/// CLI command handlers extracted from main.
pub mod commands;

/// Project configuration file (`.42_config.toml`).
pub mod config;

/// Domain errors and exit codes.
pub mod error;

/// External program invocation.
pub mod exec;

/// Tool settings and installed version.
pub mod settings;

/// Generated project files (Makefile, .gitignore, main.c).
pub mod templates;

/// Terminal output helpers.
pub mod ui;

/// Update check and self-update.
pub mod upgrade;
