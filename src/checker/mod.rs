//! Style checking with norminette.
//!
//! The checker's report is shown as-is; only its exit code is looked at.

use crate::build::{INCLUDE_DIR, SRC_DIR};
use crate::exec::{ToolStatus, Tools};
use crate::ui;
use anyhow::Result;
use std::path::Path;

/// Runs norminette over `src/` and `includes/`.
pub fn run_norminette(root: &Path, tools: &Tools) -> Result<ToolStatus> {
    ui::debug("Running norminette");
    let status = tools.lint(root, &[SRC_DIR, INCLUDE_DIR])?;
    if status.success() {
        ui::debug("Norminette passed");
    } else {
        ui::debug("Norminette failed");
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::RecordingRunner;
    use crate::settings::ToolSettings;

    #[test]
    fn test_lints_sources_and_headers() {
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default();
        let tools = Tools::new(&settings, &runner);

        let status = run_norminette(Path::new("/project"), &tools).unwrap();

        assert!(status.success());
        let call = runner.call_to("norminette").unwrap();
        assert_eq!(call.args, vec!["src", "includes"]);
    }

    #[test]
    fn test_exit_code_passes_through() {
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default().exiting("norminette", 1);
        let tools = Tools::new(&settings, &runner);

        let status = run_norminette(Path::new("/project"), &tools).unwrap();
        assert_eq!(status.code, 1);
    }
}
