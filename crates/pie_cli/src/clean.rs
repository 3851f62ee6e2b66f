//! `pie clean` — delete the cache files of one module.

use crate::settings::Settings;
use crate::{status, GlobalArgs, ModuleArgs};

/// Runs the `pie clean` command.
///
/// Removes the cache file of every candidate suffix, whether or not its
/// source still exists.
pub fn run(args: &ModuleArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    args.validate()?;
    let settings = Settings::resolve(global)?;
    let loader = settings.loader(&args.base, args.format, &args.suffixes);
    let removed = loader.clean()?;
    let noun = if removed == 1 { "file" } else { "files" };
    status(global, "Removed", format!("{removed} cache {noun}"));
    Ok(0)
}
