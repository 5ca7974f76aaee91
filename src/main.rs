//! # 42 CLI Entry Point
//!
//! This is the main executable for the `42` command-line tool.
//! It parses CLI arguments using clap and routes commands to the appropriate handlers.
//!
//! ## Command Structure
//!
//! - **Project**: `init`
//! - **Build**: `compile`, `run`
//! - **Tool**: `update`
//!
//! The global `--debug` (right after `42`) turns on diagnostics of the tool
//! itself. The `--debug` of `compile` and `run` selects the debug build and
//! valgrind instead; the two are unrelated.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use std::process::ExitCode;

use fortytwo::build::{self, BuildOptions, Project};
use fortytwo::commands::init::{self, InitOptions};
use fortytwo::error;
use fortytwo::exec::{SystemRunner, ToolStatus, Tools};
use fortytwo::settings::{self, Settings, ToolVersion};
use fortytwo::ui;
use fortytwo::upgrade;

#[derive(Parser)]
#[command(name = "42")]
#[command(about = "Scaffold, build, check and run 42 C projects", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Print diagnostic output of 42 itself
    #[arg(long, alias = "verbose")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up a new project in the current directory
    Init {
        /// DELETE everything in the current directory (except .git) before initializing
        #[arg(long)]
        force: bool,
        /// Include the libft folder found next to this project
        #[arg(long)]
        libft: bool,
        /// Include the minilibx folder found next to this project
        #[arg(long)]
        minilibx: bool,
    },
    /// Compile the project
    Compile {
        /// Compile with debug symbols
        #[arg(long)]
        debug: bool,
        /// Skip the norminette check
        #[arg(long)]
        no_norminette: bool,
    },
    /// Compile and run the project
    Run {
        /// Compile with debug symbols and run under valgrind
        #[arg(long)]
        debug: bool,
        /// Skip the norminette check
        #[arg(long)]
        no_norminette: bool,
        /// Arguments passed to the program (after `--`)
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Update 42 tools to the latest release
    Update,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    ui::set_verbose(cli.debug);

    match run(cli) {
        Ok(code) => to_exit_code(code),
        Err(e) => {
            ui::error(&format!("{:#}", e));
            to_exit_code(error::exit_code_for(&e))
        }
    }
}

fn to_exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(error::EXIT_FAILURE as u8))
}

fn run(cli: Cli) -> Result<i32> {
    let home = settings::home_dir();
    let settings = Settings::load(&home)?;
    let version = ToolVersion::load(&home);
    ui::debug(&format!(
        "42 v{} (home: {})",
        version.installed,
        home.display()
    ));

    if !matches!(cli.command, Commands::Update) {
        upgrade::warn_if_outdated(&settings, &version);
    }

    let root = std::env::current_dir().context("Failed to read the current directory")?;
    match cli.command {
        Commands::Init {
            force,
            libft,
            minilibx,
        } => {
            let options = InitOptions {
                force,
                libft,
                minilibx,
            };
            init::init_project(&root, &options)?;
            Ok(0)
        }
        Commands::Compile {
            debug,
            no_norminette,
        } => {
            let options = BuildOptions {
                debug,
                no_norminette,
            };
            with_tools(&settings, &root, |project, tools| {
                build::build_project(project, &options, tools)
            })
        }
        Commands::Run {
            debug,
            no_norminette,
            args,
        } => {
            let options = BuildOptions {
                debug,
                no_norminette,
            };
            with_tools(&settings, &root, |project, tools| {
                build::build_and_run(project, &options, &args, tools)
            })
        }
        Commands::Update => {
            upgrade::check_and_upgrade(&settings, &version, &home)?;
            Ok(0)
        }
    }
}

fn with_tools<F>(settings: &Settings, root: &Path, f: F) -> Result<i32>
where
    F: FnOnce(&Project, &Tools) -> Result<ToolStatus>,
{
    let project = Project::load(root)?;
    let runner = SystemRunner;
    let tools = Tools::new(&settings.tools, &runner);
    Ok(f(&project, &tools)?.code)
}
