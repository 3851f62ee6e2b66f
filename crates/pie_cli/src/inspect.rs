//! `pie path` and `pie inspect` — look at cache files without loading.

use std::path::Path;

use pie_cache::{Format, Header, HeaderStrategy};
use pie_formats::DocumentFormat;

use crate::settings::Settings;
use crate::{GlobalArgs, InspectArgs};

/// Runs the `pie path` command: prints where `source` is cached.
pub fn path(source: &Path, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::resolve(global)?;
    println!("{}", settings.cache_path(source)?.display());
    Ok(0)
}

/// Runs the `pie inspect` command: prints the header fields of a cache file.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::resolve(global)?;
    let raw = std::fs::read(&args.cache_file)?;
    let (header, body) = settings.strategy.split(&raw).map_err(|e| {
        format!("malformed cache file {}: {e}", args.cache_file.display())
    })?;

    if let Some(version) = header.recorded_version() {
        println!("version: {version}");
    }
    println!("digest: {}", header.digest());
    println!("digest bytes: {}", header.digest().len());
    println!("body bytes: {}", body.len());

    if args.decode {
        let doc = DocumentFormat::Auto.deserialize(body)?;
        println!("{}", serde_json::to_string_pretty(&doc.to_json())?);
    }
    Ok(0)
}
