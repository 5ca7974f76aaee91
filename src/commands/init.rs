//! Project scaffolding for `42 init`.
//!
//! Every precondition (empty directory, library folders present) is checked
//! before the first write. If writing fails part way, whatever was created is
//! removed again. Entries deleted by `--force` are gone for good.

use crate::build::{self, INCLUDE_DIR, OBJ_DIR, Project, SRC_DIR};
use crate::config::{CONFIG_FILE, ProjectConfig};
use crate::error::ProjectError;
use crate::templates;
use crate::ui;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Entries that never count as project content and survive `--force`.
const PRESERVED: &[&str] = &[".git"];

#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    pub force: bool,
    pub libft: bool,
    pub minilibx: bool,
}

/// Tracks top-level paths created in the project root so a failed
/// initialization can be undone.
struct Scaffold<'a> {
    root: &'a Path,
    created: Vec<PathBuf>,
}

impl<'a> Scaffold<'a> {
    fn new(root: &'a Path) -> Self {
        Self {
            root,
            created: Vec::new(),
        }
    }

    fn track(&mut self, relative: &str) -> PathBuf {
        let top = relative.split('/').next().unwrap_or(relative);
        let top_path = self.root.join(top);
        if !self.created.contains(&top_path) {
            self.created.push(top_path);
        }
        self.root.join(relative)
    }

    fn create_dir(&mut self, relative: &str) -> Result<()> {
        let path = self.track(relative);
        fs::create_dir_all(&path).with_context(|| format!("Failed to create {}", path.display()))
    }

    fn write(&mut self, relative: &str, content: &str) -> Result<()> {
        let path = self.track(relative);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn copy_library(&mut self, name: &str, source: &Path) -> Result<()> {
        let dest = self.track(name);
        ui::debug(&format!("Including {} from {}", name, source.display()));
        copy_dir_all(source, &dest)
            .with_context(|| format!("Failed to copy {} into the project", source.display()))
    }

    fn rollback(self) {
        for path in self.created.iter().rev() {
            let removed = if path.is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            if removed.is_ok() {
                ui::debug(&format!("Rolled back {}", path.display()));
            }
        }
    }
}

pub fn init_project(root: &Path, options: &InitOptions) -> Result<()> {
    // 1. Pre-flight: nothing is touched until all of these pass
    let existing = project_entries(root)?;
    if !existing.is_empty() && !options.force {
        return Err(ProjectError::DirectoryNotEmpty(root.to_path_buf()).into());
    }

    let mut libraries = Vec::new();
    if options.libft {
        libraries.push(("libft", find_folder(root, "libft")?));
    }
    if options.minilibx {
        libraries.push(("minilibx", find_folder(root, "minilibx")?));
    }

    // 2. Wipe
    if options.force && !existing.is_empty() {
        ui::warn(&format!(
            "--force: permanently deleting {} existing entr{} in {}",
            existing.len(),
            if existing.len() == 1 { "y" } else { "ies" },
            root.display()
        ));
        for path in &existing {
            remove_entry(path)?;
        }
    }

    // 3. Populate
    let config = ProjectConfig {
        libft: options.libft,
        minilibx: options.minilibx,
    };
    let mut scaffold = Scaffold::new(root);
    if let Err(e) = populate(&mut scaffold, &config, &libraries) {
        ui::error("Initialization failed, removing partially created files");
        scaffold.rollback();
        return Err(e);
    }

    ui::success(&format!(
        "Project {} initialized successfully",
        build::project_name(root).bold()
    ));
    println!("  Run {} to build and run it.", "42 run".bold().white());
    Ok(())
}

fn populate(
    scaffold: &mut Scaffold,
    config: &ProjectConfig,
    libraries: &[(&str, PathBuf)],
) -> Result<()> {
    let root = scaffold.root;
    let name = build::project_name(root);

    ui::debug("Creating folders");
    scaffold.create_dir(SRC_DIR)?;
    scaffold.create_dir(INCLUDE_DIR)?;
    scaffold.create_dir(OBJ_DIR)?;
    scaffold.write(&format!("{}/main.c", SRC_DIR), &templates::render_main(config))?;

    for (lib, source) in libraries {
        scaffold.copy_library(lib, source)?;
    }

    scaffold.write(".gitignore", &templates::render_gitignore(&name))?;

    scaffold.track(CONFIG_FILE);
    config.save(root)?;

    scaffold.track("Makefile");
    let project = Project {
        root: root.to_path_buf(),
        name,
        config: *config,
    };
    build::sync_makefiles(&project, false)?;
    Ok(())
}

/// Everything in `root` that counts as project content.
fn project_entries(root: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("Failed to read {}", root.display()))? {
        let entry = entry?;
        let name = entry.file_name();
        if PRESERVED.iter().any(|p| name == *p) {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

fn remove_entry(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path)?;
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.with_context(|| format!("Failed to delete {}", path.display()))
}

/// Looks for a directory called `name` next to `root`, then next to each of
/// its ancestors. The project itself and folders containing it never match.
pub fn find_folder(root: &Path, name: &str) -> Result<PathBuf> {
    ui::debug(&format!("Finding {} folder", name));
    for dir in root.ancestors().skip(1) {
        let candidate = dir.join(name);
        ui::debug(&format!("Checking {}", candidate.display()));
        if candidate.is_dir() && !root.starts_with(&candidate) {
            ui::debug(&format!("{} folder found at {}", name, candidate.display()));
            return Ok(candidate);
        }
    }
    Err(ProjectError::MissingDependency(name.to_string()).into())
}

// Recursive copy that leaves version control metadata behind
fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_name() == ".git" {
            continue;
        }
        let ty = entry.file_type()?;
        let target = dst.join(entry.file_name());
        if ty.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else if ty.is_symlink() {
            copy_symlink(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link = fs::read_link(src)?;
    std::os::unix::fs::symlink(link, dst)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)?;
    Ok(())
}
