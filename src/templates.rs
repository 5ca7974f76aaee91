//! Generated project files.
//!
//! - `Makefile` - regenerated on every build, see [`render_makefile`]
//! - `.gitignore` - written once by `42 init`
//! - `src/main.c` - starter entry point written by `42 init`

use crate::config::ProjectConfig;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "# Generated using 42 tools, manual changes may be overwritten";

/// Inputs of a Makefile rendering.
pub struct MakefileSpec<'a> {
    pub name: &'a str,
    pub config: ProjectConfig,
    pub debug: bool,
    /// Source paths relative to the project root, e.g. `src/main.c`
    pub sources: &'a [String],
}

pub fn c_flags(config: &ProjectConfig, debug: bool) -> String {
    let mut flags = vec!["-Wall", "-Wextra", "-Werror", "-I./includes"];
    if debug {
        flags.push("-g");
    }
    if config.has_libraries() {
        flags.push("-I./");
    }
    flags.join(" ")
}

pub fn ld_flags(config: &ProjectConfig) -> String {
    let mut flags = Vec::new();
    if config.libft {
        flags.extend(["-L./libft", "-lft"]);
    }
    if config.minilibx {
        flags.extend(["-L./minilibx", "-lmlx", "-lX11", "-lXext", "-lm"]);
    }
    flags.join(" ")
}

fn lib_archives(config: &ProjectConfig) -> Vec<&'static str> {
    let mut libs = Vec::new();
    if config.libft {
        libs.push("libft/libft.a");
    }
    if config.minilibx {
        libs.push("minilibx/libmlx.a");
    }
    libs
}

/// `$(MAKE) -C <lib> <rule>` lines for each included library. minilibx ships
/// no `fclean`, so it gets `clean` there.
fn lib_commands(config: &ProjectConfig, rule: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if config.libft {
        lines.push(format!("\t$(MAKE) -C libft {}", rule));
    }
    if config.minilibx {
        let rule = if rule == "fclean" { "clean" } else { rule };
        lines.push(format!("\t$(MAKE) -C minilibx {}", rule));
    }
    lines
}

pub fn render_makefile(spec: &MakefileSpec) -> String {
    let config = &spec.config;
    let archives = lib_archives(config);

    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n## Commands ##\n\n");
    out.push_str("CC = cc\n");
    out.push_str(&format!("CFLAGS = {}\n", c_flags(config, spec.debug)));
    out.push_str(&format!("LDFLAGS = {}\n", ld_flags(config)).replace(" \n", "\n"));
    out.push_str("RM = rm -f\n");

    out.push_str("\n## Files ##\n\n");
    out.push_str(&format!("SRCS = {}\n", spec.sources.join(" ")).replace(" \n", "\n"));
    out.push_str("OBJS = $(SRCS:src/%.c=obj/%.o)\n");

    out.push_str("\n## Configuration ##\n\n");
    out.push_str(&format!("NAME = {}\n", spec.name));

    out.push_str("\n## Compilation rules ##\n\n");
    out.push_str("all: $(NAME)\n\n");
    let mut prerequisites = vec!["$(OBJS)"];
    prerequisites.extend(archives.iter().copied());
    out.push_str(&format!("$(NAME): {}\n", prerequisites.join(" ")));
    out.push_str("\t$(CC) $(CFLAGS) -o $@ $(OBJS) $(LDFLAGS)\n\n");
    out.push_str("obj/%.o: src/%.c\n");
    out.push_str("\t$(CC) $(CFLAGS) -c -o $@ $<\n");

    out.push_str("\n## Cleaning rules ##\n\n");
    out.push_str("clean:\n\t$(RM) $(OBJS)\n");
    for line in lib_commands(config, "clean") {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("\nfclean: clean\n\t$(RM) $(NAME)\n");
    for line in lib_commands(config, "fclean") {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("\nre: fclean all\n");
    for line in lib_commands(config, "re") {
        out.push_str(&line);
        out.push('\n');
    }

    if !archives.is_empty() {
        out.push_str("\n## Libraries ##\n");
        for archive in &archives {
            let dir = archive.split('/').next().unwrap_or(archive);
            out.push_str(&format!("\n{}:\n\t$(MAKE) -C {}\n", archive, dir));
        }
    }

    out.push_str("\n.PHONY: all clean fclean re\n");
    out
}

pub fn render_gitignore(name: &str) -> String {
    format!(
        "{}\n\n# IDE files\n.vscode\n\n# Compiled files\n*.o\n*.a\nobj/\n/{}\n",
        GENERATED_HEADER, name
    )
}

pub fn render_main(config: &ProjectConfig) -> String {
    let mut out = String::new();
    if config.libft {
        out.push_str("#include \"libft/libft.h\"\n");
    } else {
        out.push_str("#include <unistd.h>\n");
    }
    out.push_str("\nint\tmain(void)\n{\n");
    if config.libft {
        out.push_str("\tft_putendl_fd(\"Hello, 42!\", 1);\n");
    } else {
        out.push_str("\twrite(1, \"Hello, 42!\\n\", 11);\n");
    }
    out.push_str("\treturn (0);\n}\n");
    out
}
