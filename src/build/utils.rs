use crate::config::ProjectConfig;
use crate::ui;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SRC_DIR: &str = "src";
pub const INCLUDE_DIR: &str = "includes";
pub const OBJ_DIR: &str = "obj";

/// An initialized project: its root directory and recorded configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub name: String,
    pub config: ProjectConfig,
}

impl Project {
    pub fn load(root: &Path) -> Result<Self> {
        let config = ProjectConfig::load(root)?;
        ui::debug(&format!("Loaded project config: {:?}", config));
        Ok(Self {
            root: root.to_path_buf(),
            name: project_name(root),
            config,
        })
    }

    /// Path of the built program as `make` leaves it, relative to the root.
    pub fn binary(&self) -> String {
        format!("./{}", self.name)
    }
}

/// The project (and binary) name is the name of its directory.
pub fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "a.out".to_string())
}

/// Every `.c` file under `src/`, relative to the root with `/` separators,
/// sorted so the generated Makefile is stable.
pub fn collect_sources(root: &Path) -> Vec<String> {
    let src = root.join(SRC_DIR);
    let mut sources: Vec<String> = WalkDir::new(&src)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "c"))
        .filter_map(|e| {
            e.path().strip_prefix(root).ok().map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect();
    sources.sort();
    sources
}

/// Creates `obj/<dir>` for every directory holding sources under `src/`, so
/// the pattern rule can write nested object files.
pub fn mirror_source_tree(root: &Path) -> Result<()> {
    let src = root.join(SRC_DIR);
    let obj = root.join(OBJ_DIR);
    fs::create_dir_all(&obj).with_context(|| format!("Failed to create {}", obj.display()))?;

    for entry in WalkDir::new(&src).min_depth(1).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(&src) {
            let target = obj.join(rel);
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        }
    }
    ui::debug("Source structure mirrored into obj/");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_sources_only_c_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/parse")).unwrap();
        fs::write(root.join("src/main.c"), "").unwrap();
        fs::write(root.join("src/parse/args.c"), "").unwrap();
        fs::write(root.join("src/parse/args.h"), "").unwrap();
        fs::write(root.join("src/notes.txt"), "").unwrap();

        assert_eq!(
            collect_sources(root),
            vec!["src/main.c".to_string(), "src/parse/args.c".to_string()]
        );
    }

    #[test]
    fn test_collect_sources_without_src_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_sources(dir.path()).is_empty());
    }

    #[test]
    fn test_mirror_source_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/a/b")).unwrap();
        fs::create_dir_all(root.join("src/c")).unwrap();

        mirror_source_tree(root).unwrap();

        assert!(root.join("obj/a/b").is_dir());
        assert!(root.join("obj/c").is_dir());
    }

    #[test]
    fn test_project_name_and_binary() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("minishell");
        fs::create_dir(&root).unwrap();
        ProjectConfig::default().save(&root).unwrap();

        let project = Project::load(&root).unwrap();
        assert_eq!(project.name, "minishell");
        assert_eq!(project.binary(), "./minishell");
    }
}
