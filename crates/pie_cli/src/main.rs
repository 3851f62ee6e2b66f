//! pie CLI — load structured documents through the compile-once cache.
//!
//! Provides `pie load` to print a module through its cache, `pie check` to
//! report whether its cache is fresh, `pie path` to show where a source is
//! cached, `pie inspect` to decode a cache file header, and `pie clean` to
//! delete a module's cache files.

#![warn(missing_docs)]

mod clean;
mod inspect;
mod load;
mod logging;
mod settings;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use pie_formats::DocumentFormat;

/// pie — compile once, reuse until stale.
#[derive(Parser, Debug)]
#[command(name = "pie", version, about = "Compile-once document cache")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `pie.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a module and print it as JSON.
    Load(LoadArgs),
    /// Report whether a module's cache is fresh.
    Check(ModuleArgs),
    /// Print the cache file path for a source file.
    Path {
        /// Source file path, including its extension.
        source: PathBuf,
    },
    /// Decode the header of a cache file.
    Inspect(InspectArgs),
    /// Delete a module's cache files.
    Clean(ModuleArgs),
}

/// Identifies one module: a base path and the suffixes to try.
#[derive(Args, Debug)]
pub struct ModuleArgs {
    /// Module base path without extension (e.g. `config/app`).
    pub base: PathBuf,

    /// Source format; `auto` tries json, yml, yaml, then toml.
    #[arg(short, long, default_value_t = DocumentFormat::Auto)]
    pub format: DocumentFormat,

    /// Override the format's suffixes, in priority order (e.g. `--suffix .jsonc`).
    ///
    /// With `--format auto` every suffix must end in a known extension, since
    /// the parser is picked from it; name a format to use other suffixes.
    #[arg(long = "suffix", num_args = 1..)]
    pub suffixes: Vec<String>,
}

impl ModuleArgs {
    /// Rejects suffixes `auto` could not pick a parser for.
    pub fn validate(&self) -> Result<(), String> {
        if self.format != DocumentFormat::Auto {
            return Ok(());
        }
        for suffix in &self.suffixes {
            let ext = Path::new(suffix)
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or_else(|| suffix.trim_start_matches('.'));
            if DocumentFormat::from_extension(ext).is_none() {
                return Err(format!(
                    "suffix '{suffix}' needs an explicit --format (json, yaml or toml)"
                ));
            }
        }
        Ok(())
    }
}

/// Arguments for the `pie load` subcommand.
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// The module to load.
    #[command(flatten)]
    pub module: ModuleArgs,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `pie inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to a cache file.
    pub cache_file: PathBuf,

    /// Also decode the body as a document and print it.
    #[arg(long)]
    pub decode: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Load(ref args) => load::run(args, &global),
        Command::Check(ref args) => load::check(args, &global),
        Command::Path { ref source } => inspect::path(source, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Prints a right-aligned status line to stderr unless `--quiet` is set.
fn status(global: &GlobalArgs, verb: &str, message: impl std::fmt::Display) {
    if !global.quiet {
        eprintln!("{verb:>12} {message}");
    }
}

/// Names a source for a status line, adding its cache file under `--verbose`.
fn describe(global: &GlobalArgs, source: &Path, cache: &Path) -> String {
    if global.verbose {
        format!("{} ({})", source.display(), cache.display())
    } else {
        source.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_load_default() {
        let cli = Cli::parse_from(["pie", "load", "config/app"]);
        match cli.command {
            Command::Load(ref args) => {
                assert_eq!(args.module.base, PathBuf::from("config/app"));
                assert_eq!(args.module.format, DocumentFormat::Auto);
                assert!(args.module.suffixes.is_empty());
                assert!(!args.pretty);
            }
            _ => panic!("expected Load command"),
        }
    }

    #[test]
    fn parse_load_with_args() {
        let cli = Cli::parse_from([
            "pie", "load", "conf", "--format", "yaml", "--suffix", ".yaml", ".yml", "--pretty",
        ]);
        match cli.command {
            Command::Load(ref args) => {
                assert_eq!(args.module.format, DocumentFormat::Yaml);
                assert_eq!(args.module.suffixes, vec![".yaml", ".yml"]);
                assert!(args.pretty);
            }
            _ => panic!("expected Load command"),
        }
    }

    #[test]
    fn auto_rejects_unknown_suffix() {
        let cli = Cli::parse_from(["pie", "check", "conf", "--suffix", ".jsonc"]);
        let Command::Check(args) = cli.command else {
            panic!("expected Check command");
        };
        let err = args.validate().unwrap_err();
        assert!(err.contains(".jsonc"));

        let cli = Cli::parse_from(["pie", "check", "conf", "--suffix", ".local.yaml", ".json"]);
        let Command::Check(args) = cli.command else {
            panic!("expected Check command");
        };
        assert!(args.validate().is_ok());

        let cli = Cli::parse_from(["pie", "check", "conf", "-f", "json", "--suffix", ".jsonc"]);
        let Command::Check(args) = cli.command else {
            panic!("expected Check command");
        };
        assert!(args.validate().is_ok());
    }

    #[test]
    fn parse_unknown_format_fails() {
        assert!(Cli::try_parse_from(["pie", "load", "conf", "--format", "ini"]).is_err());
    }

    #[test]
    fn parse_check_and_clean() {
        let cli = Cli::parse_from(["pie", "check", "conf", "-f", "toml"]);
        assert!(matches!(
            cli.command,
            Command::Check(ModuleArgs {
                format: DocumentFormat::Toml,
                ..
            })
        ));
        let cli = Cli::parse_from(["pie", "clean", "conf"]);
        assert!(matches!(cli.command, Command::Clean(_)));
    }

    #[test]
    fn parse_path() {
        let cli = Cli::parse_from(["pie", "path", "conf.json"]);
        match cli.command {
            Command::Path { source } => assert_eq!(source, PathBuf::from("conf.json")),
            _ => panic!("expected Path command"),
        }
    }

    #[test]
    fn parse_inspect() {
        let cli = Cli::parse_from(["pie", "inspect", "__piecache__/conf.json.v1.pie", "--decode"]);
        match cli.command {
            Command::Inspect(ref args) => {
                assert!(args.decode);
                assert!(args.cache_file.ends_with("conf.json.v1.pie"));
            }
            _ => panic!("expected Inspect command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["pie", "--quiet", "--config", "/etc/pie.toml", "check", "x"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/pie.toml")));
    }

    #[test]
    fn verbose_status_names_cache_file() {
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: None,
        };
        let source = Path::new("/srv/conf.json");
        let cache = Path::new("/srv/__piecache__/conf.json.v1.pie");
        assert_eq!(describe(&global, source, cache), "/srv/conf.json");

        global.verbose = true;
        assert_eq!(
            describe(&global, source, cache),
            "/srv/conf.json (/srv/__piecache__/conf.json.v1.pie)"
        );
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["pie", "load", "x", "-v"]);
        assert!(cli.verbose);
    }
}
