//! Domain errors and the exit codes they map to.

use std::path::PathBuf;

/// Exit code for errors that carry no more specific meaning.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code clap uses for usage errors.
pub const EXIT_USAGE: i32 = 2;

/// Failures the tool reports itself, as opposed to failures of the external
/// tools it drives (those propagate their own exit codes).
#[derive(Debug)]
pub enum ProjectError {
    /// `init` without `--force` in a directory that already has content
    DirectoryNotEmpty(PathBuf),
    /// A requested sibling library folder could not be located
    MissingDependency(String),
    /// `compile` / `run` outside a directory set up by `init`
    NotInitialized(PathBuf),
    /// Update check or self-update could not reach / use the release source
    Network(String),
    /// An external program could not be spawned because it does not exist
    ToolNotFound(String),
}

impl ProjectError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ProjectError::DirectoryNotEmpty(_) => 3,
            ProjectError::MissingDependency(_) => 4,
            ProjectError::NotInitialized(_) => 5,
            ProjectError::Network(_) => 6,
            ProjectError::ToolNotFound(_) => 127,
        }
    }
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectError::DirectoryNotEmpty(dir) => write!(
                f,
                "Directory '{}' is not empty. Use 'init --force' to wipe it and start over.",
                dir.display()
            ),
            ProjectError::MissingDependency(name) => write!(
                f,
                "Could not find a '{}' folder next to this project or any of its parents",
                name
            ),
            ProjectError::NotInitialized(dir) => write!(
                f,
                "Project in '{}' has not been initialized yet or its config file was deleted. Run '42 init' first.",
                dir.display()
            ),
            ProjectError::Network(msg) => write!(f, "Update failed: {}", msg),
            ProjectError::ToolNotFound(program) => {
                write!(f, "'{}' not found. Is it installed and on your PATH?", program)
            }
        }
    }
}

impl std::error::Error for ProjectError {}

/// Picks the process exit code for an error that reached `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ProjectError>())
        .map(ProjectError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes_are_distinct_from_success_and_usage() {
        let errors = [
            ProjectError::DirectoryNotEmpty(PathBuf::from(".")),
            ProjectError::MissingDependency("libft".to_string()),
            ProjectError::NotInitialized(PathBuf::from(".")),
            ProjectError::Network("offline".to_string()),
            ProjectError::ToolNotFound("valgrind".to_string()),
        ];
        for err in &errors {
            assert_ne!(err.exit_code(), 0);
            assert_ne!(err.exit_code(), EXIT_USAGE);
        }
    }

    #[test]
    fn test_exit_code_found_through_context() {
        let err = Err::<(), _>(ProjectError::MissingDependency("minilibx".into()))
            .context("Failed to initialize project")
            .unwrap_err();
        assert_eq!(exit_code_for(&err), 4);
    }

    #[test]
    fn test_plain_errors_use_generic_code() {
        let err = anyhow::anyhow!("disk full");
        assert_eq!(exit_code_for(&err), EXIT_FAILURE);
    }
}
