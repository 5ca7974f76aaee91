//! Terminal output helpers.
//!
//! Status lines follow a small fixed vocabulary:
//!
//! - `✓` success (stdout)
//! - `!` warning (stderr)
//! - `x` error (stderr)
//! - `·` diagnostics, only shown with the global `--debug` flag (stderr)
//!
//! ## Example
//!
//! ```rust
//! fortytwo::ui::set_verbose(true);
//! fortytwo::ui::debug("Running command: make");
//! fortytwo::ui::success("Project compiled successfully");
//! ```

use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enables diagnostic output for the rest of the process.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn step(message: &str) {
    println!("{} {}", "▶".cyan(), message);
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "!".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "x".red(), message);
}

pub fn debug(message: &str) {
    if is_verbose() {
        eprintln!("{} {}", "·".dimmed(), message.dimmed());
    }
}

/// Renders a command line the way a user would type it, for diagnostics.
pub fn format_command(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push_str(&format!("'{}'", arg));
        } else {
            line.push_str(arg);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_command_quotes_whitespace() {
        let args = vec!["a b".to_string(), "c".to_string(), String::new()];
        assert_eq!(format_command("./prog", &args), "./prog 'a b' c ''");
    }

    #[test]
    fn test_format_command_without_args() {
        assert_eq!(format_command("make", &[]), "make");
    }
}
