//! Keeps the generated Makefile and included library Makefiles in sync with
//! the build mode.

use super::utils::{Project, collect_sources};
use crate::templates::{self, MakefileSpec};
use crate::ui;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Makefiles of included libraries whose `CFLAGS` follow the debug mode.
const LIBFT_MAKEFILE: &str = "libft/Makefile";
const MINILIBX_MAKEFILE: &str = "minilibx/Makefile.mk";

/// Writes `content` to `path` unless it already holds exactly that.
/// Returns whether the file changed.
fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    if let Ok(existing) = fs::read_to_string(path)
        && existing == content
    {
        return Ok(false);
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

/// Regenerates the project Makefile and library debug flags. Returns whether
/// anything changed, in which case objects must be rebuilt.
pub fn sync_makefiles(project: &Project, debug: bool) -> Result<bool> {
    let sources = collect_sources(&project.root);
    let content = templates::render_makefile(&MakefileSpec {
        name: &project.name,
        config: project.config,
        debug,
        sources: &sources,
    });

    let mut modified = write_if_changed(&project.root.join("Makefile"), &content)?;
    if modified {
        ui::debug("Makefile created/updated");
    } else {
        ui::debug("Makefile up to date");
    }

    if project.config.libft && patch_library_makefile(&project.root.join(LIBFT_MAKEFILE), debug)? {
        modified = true;
    }
    if project.config.minilibx
        && patch_library_makefile(&project.root.join(MINILIBX_MAKEFILE), debug)?
    {
        modified = true;
    }

    Ok(modified)
}

/// Adds or removes `-g` in the first `CFLAGS` assignment of a library
/// Makefile. A missing file or assignment only warns.
fn patch_library_makefile(path: &Path, debug: bool) -> Result<bool> {
    let Ok(makefile) = fs::read_to_string(path) else {
        ui::warn(&format!(
            "{} not found, included library keeps its own flags",
            path.display()
        ));
        return Ok(false);
    };

    match set_debug_flag(&makefile, debug) {
        Some(updated) if updated != makefile => {
            fs::write(path, &updated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ui::debug(&format!("Updated CFLAGS in {}", path.display()));
            Ok(true)
        }
        Some(_) => Ok(false),
        None => {
            ui::warn(&format!(
                "Could not find CFLAGS in {}, cannot switch its debug flags",
                path.display()
            ));
            Ok(false)
        }
    }
}

/// Rewrites the first `CFLAGS =`, `CFLAGS :=` or `CFLAGS ?=` line so that it
/// contains `-g` exactly when `debug` is set. `None` when there is no such line.
pub fn set_debug_flag(makefile: &str, debug: bool) -> Option<String> {
    let re = Regex::new(r"(?m)^CFLAGS[ \t]*([:?]?)=[ \t]*(.*)$").ok()?;
    let caps = re.captures(makefile)?;
    let whole = caps.get(0)?;
    let operator = caps.get(1).map_or("", |m| m.as_str());
    let flags = caps.get(2).map_or("", |m| m.as_str());

    let mut tokens: Vec<&str> = flags.split_whitespace().filter(|t| *t != "-g").collect();
    if debug {
        tokens.push("-g");
    }

    let line = format!("CFLAGS {}= {}", operator, tokens.join(" "));
    let line = line.trim_end();

    let mut updated = String::with_capacity(makefile.len() + 3);
    updated.push_str(&makefile[..whole.start()]);
    updated.push_str(line);
    updated.push_str(&makefile[whole.end()..]);
    Some(updated)
}
