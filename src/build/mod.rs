mod core;
mod makefile;
mod utils;

pub use self::core::{BuildOptions, build_and_run, build_project};
pub use makefile::sync_makefiles;
pub use utils::{INCLUDE_DIR, OBJ_DIR, Project, SRC_DIR, collect_sources, project_name};
