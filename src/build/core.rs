use super::makefile::sync_makefiles;
use super::utils::{Project, mirror_source_tree};
use crate::checker;
use crate::error::ProjectError;
use crate::exec::{ToolStatus, Tools};
use crate::ui;
use anyhow::Result;
use std::time::Instant;

/// Flags shared by `compile` and `run`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Compile with debug symbols (and, for `run`, execute under valgrind)
    pub debug: bool,
    /// Skip the norminette pass
    pub no_norminette: bool,
}

// --- CORE: Build Project ---
pub fn build_project(project: &Project, options: &BuildOptions, tools: &Tools) -> Result<ToolStatus> {
    let start_time = Instant::now();
    ui::debug("Running compile");

    // 1. Makefiles follow sources and build mode
    let modified = sync_makefiles(project, options.debug)?;

    // 2. Style check (reported, never blocking)
    if !options.no_norminette {
        match checker::run_norminette(&project.root, tools) {
            Ok(lint) if !lint.success() => {
                ui::warn("Norminette reported errors, compiling anyway");
            }
            Ok(_) => {}
            Err(e) if matches!(
                e.downcast_ref::<ProjectError>(),
                Some(ProjectError::ToolNotFound(_))
            ) => {
                ui::warn("norminette not found, skipping style check");
            }
            Err(e) => return Err(e),
        }
    }

    // 3. Object directories
    mirror_source_tree(&project.root)?;

    // 4. make, forcing a rebuild when flags may have changed
    if modified {
        ui::debug("Makefiles changed, forcing a full rebuild");
    }
    let status = tools.compile(&project.root, modified)?;

    if status.success() {
        ui::success(&format!(
            "Project compiled successfully in {:.2?}",
            start_time.elapsed()
        ));
    } else {
        ui::error("Project failed to compile");
    }
    Ok(status)
}

// --- COMMAND: Build & Run ---
pub fn build_and_run(
    project: &Project,
    options: &BuildOptions,
    run_args: &[String],
    tools: &Tools,
) -> Result<ToolStatus> {
    let build = build_project(project, options, tools)?;
    if !build.success() {
        return Ok(build);
    }

    let binary = project.binary();
    if options.debug {
        ui::step(&format!("Running {} under valgrind...\n", binary));
        tools.mem_check(&project.root, &binary, run_args)
    } else {
        ui::step(&format!("Running {}...\n", binary));
        tools.run(&project.root, &binary, run_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::exec::testing::RecordingRunner;
    use crate::settings::ToolSettings;
    use std::fs;
    use std::path::Path;

    fn project(root: &Path) -> Project {
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.c"), "int main(void){return 0;}").unwrap();
        Project {
            root: root.to_path_buf(),
            name: "ex00".to_string(),
            config: ProjectConfig::default(),
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compile_runs_norminette_then_make() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default();
        let tools = Tools::new(&settings, &runner);

        let status = build_project(&project, &BuildOptions::default(), &tools).unwrap();

        assert!(status.success());
        assert_eq!(runner.programs(), vec!["norminette", "make"]);
        assert!(dir.path().join("Makefile").exists());
        assert!(dir.path().join("obj").is_dir());
    }

    #[test]
    fn test_no_norminette_skips_style_check() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default();
        let tools = Tools::new(&settings, &runner);
        let options = BuildOptions {
            no_norminette: true,
            ..BuildOptions::default()
        };

        build_project(&project, &options, &tools).unwrap();

        assert_eq!(runner.programs(), vec!["make"]);
    }

    #[test]
    fn test_lint_failure_does_not_block_make() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default().exiting("norminette", 1);
        let tools = Tools::new(&settings, &runner);

        let status = build_project(&project, &BuildOptions::default(), &tools).unwrap();

        assert!(status.success());
        assert!(runner.call_to("make").is_some());
    }

    #[test]
    fn test_missing_norminette_does_not_block_make() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default().missing("norminette");
        let tools = Tools::new(&settings, &runner);

        let status = build_project(&project, &BuildOptions::default(), &tools).unwrap();

        assert!(status.success());
        assert_eq!(runner.programs(), vec!["norminette", "make"]);
    }

    #[test]
    fn test_missing_make_is_still_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default().missing("make");
        let tools = Tools::new(&settings, &runner);

        let err = build_project(&project, &BuildOptions::default(), &tools).unwrap_err();

        assert_eq!(crate::error::exit_code_for(&err), 127);
    }

    #[test]
    fn test_make_forced_only_after_makefile_change() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default();
        let tools = Tools::new(&settings, &runner);
        let options = BuildOptions {
            no_norminette: true,
            ..BuildOptions::default()
        };

        build_project(&project, &options, &tools).unwrap();
        build_project(&project, &options, &tools).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls[0].args, vec!["-B"]);
        assert!(calls[1].args.is_empty());
    }

    #[test]
    fn test_run_forwards_arguments_and_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default().exiting("./ex00", 7);
        let tools = Tools::new(&settings, &runner);

        let status = build_and_run(
            &project,
            &BuildOptions::default(),
            &args(&["a", "b", "c"]),
            &tools,
        )
        .unwrap();

        assert_eq!(status.code, 7);
        let call = runner.call_to("./ex00").unwrap();
        assert_eq!(call.args, args(&["a", "b", "c"]));
        assert!(runner.call_to("valgrind").is_none());
    }

    #[test]
    fn test_run_debug_uses_valgrind() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default();
        let tools = Tools::new(&settings, &runner);
        let options = BuildOptions {
            debug: true,
            no_norminette: true,
        };

        build_and_run(&project, &options, &args(&["-n", "5"]), &tools).unwrap();

        let call = runner.call_to("valgrind").unwrap();
        assert_eq!(call.args, args(&["./ex00", "-n", "5"]));
        let makefile = fs::read_to_string(dir.path().join("Makefile")).unwrap();
        assert!(makefile.contains(" -g\n"));
    }

    #[test]
    fn test_run_stops_after_failed_build() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let settings = ToolSettings::default();
        let runner = RecordingRunner::default().exiting("make", 2);
        let tools = Tools::new(&settings, &runner);

        let status = build_and_run(&project, &BuildOptions::default(), &[], &tools).unwrap();

        assert_eq!(status.code, 2);
        assert_eq!(runner.programs(), vec!["norminette", "make"]);
    }
}
