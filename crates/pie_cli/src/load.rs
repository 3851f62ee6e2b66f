//! `pie load` and `pie check` — go through the cache for one module.

use pie_cache::{CacheStatus, LoadOutcome};
use tracing::debug;

use crate::settings::Settings;
use crate::{describe, status, GlobalArgs, LoadArgs, ModuleArgs};

/// Runs the `pie load` command.
///
/// Prints the document as JSON on stdout and a status line on stderr.
pub fn run(args: &LoadArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::resolve(global)?;
    debug!(config = ?settings.config_path, "resolved cache settings");

    let module = &args.module;
    module.validate()?;
    let loader = settings.loader(&module.base, module.format, &module.suffixes);
    let loaded = loader.load_header_and_program()?;

    let verb = match loaded.outcome {
        LoadOutcome::Fresh => "Fresh",
        LoadOutcome::Compiled(_) => "Compiled",
    };
    status(
        global,
        verb,
        describe(global, &loaded.source_path, &loaded.cache_path),
    );

    let json = loaded.program.to_json();
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    println!("{rendered}");
    Ok(0)
}

/// Runs the `pie check` command.
///
/// Returns exit code 0 if the cache is fresh, 1 if it is stale or missing.
pub fn check(args: &ModuleArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    args.validate()?;
    let settings = Settings::resolve(global)?;
    let loader = settings.loader(&args.base, args.format, &args.suffixes);

    let code = match loader.status()? {
        CacheStatus::Fresh { source, cache } => {
            status(global, "Fresh", describe(global, &source, &cache));
            0
        }
        CacheStatus::Stale { source, cache } => {
            status(global, "Stale", describe(global, &source, &cache));
            1
        }
        CacheStatus::Missing { source, cache } => {
            status(global, "Uncached", describe(global, &source, &cache));
            1
        }
    };
    Ok(code)
}
