//! The caching loader: find a module's source, reuse or rebuild its cache.
//!
//! For one module, identified by a base path and an ordered suffix list, the
//! loader:
//!
//! 1. Walks the suffixes in order and picks the first whose source file exists
//! 2. Derives the cache path for that source via [`CacheLayout`]
//! 3. Decodes the cached header and program, failing loudly if either is
//!    malformed, whether or not the cache is still fresh
//! 4. Reuses the cached program if the header is fresh for the current source
//! 5. Otherwise compiles, serializes, frames, and atomically writes the cache
//!
//! Compilation failures propagate untouched and never replace an existing
//! cache entry: the write happens only after compile and serialize succeed.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::CacheError;
use crate::header::{DigestStrategy, Header, HeaderStrategy};
use crate::layout::{self, CacheLayout};
use crate::store;

/// A pluggable source format: how to compile it and how to encode the result.
///
/// `deserialize(serialize(p))` must be observably equivalent to `p` for every
/// program `compile` can produce.
pub trait Format {
    /// The in-memory result of compiling one source file.
    type Program;

    /// Format-specific failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Dot-prefixed extensions this format recognizes, in priority order.
    fn suffixes(&self) -> &[&str];

    /// Translates raw source bytes into a program.
    fn compile(&self, src: &[u8], path: &Path) -> Result<Self::Program, Self::Error>;

    /// Encodes a program for the cache body.
    fn serialize(&self, program: &Self::Program) -> Result<Vec<u8>, Self::Error>;

    /// Decodes a program from a cache body.
    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Program, Self::Error>;
}

/// Identity of one load: a base path without suffix plus candidate suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderRequest {
    base: PathBuf,
    suffixes: Vec<String>,
}

impl LoaderRequest {
    /// Creates a request for `base` trying `suffixes` in order.
    pub fn new<I, S>(base: impl Into<PathBuf>, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base: base.into(),
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    /// The base path the suffixes are appended to.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// The candidate suffixes, highest priority first.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Candidate source paths in priority order.
    pub fn candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.suffixes
            .iter()
            .map(|suffix| layout::with_suffix(&self.base, suffix))
    }
}

/// Why a load had to run the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileReason {
    /// No cache file existed.
    Miss,
    /// The cache header did not match the current source.
    Stale,
}

/// How a [`Loaded`] program was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Decoded from a fresh cache file.
    Fresh,
    /// Compiled from source, and the cache rewritten.
    Compiled(CompileReason),
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Fresh => f.write_str("fresh"),
            LoadOutcome::Compiled(CompileReason::Miss) => f.write_str("compiled (no cache)"),
            LoadOutcome::Compiled(CompileReason::Stale) => f.write_str("compiled (stale cache)"),
        }
    }
}

/// Result of a successful load.
#[derive(Debug)]
pub struct Loaded<H, P> {
    /// Header that now describes the cache file.
    pub header: H,
    /// The loaded program.
    pub program: P,
    /// Absolute path of the source that was used.
    pub source_path: PathBuf,
    /// Absolute path of its cache file.
    pub cache_path: PathBuf,
    /// Whether the program came from the cache or the compiler.
    pub outcome: LoadOutcome,
}

/// Cache state of a module, computed without compiling anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// The cache matches the current source.
    Fresh {
        /// Absolute source path.
        source: PathBuf,
        /// Absolute cache path.
        cache: PathBuf,
    },
    /// The cache exists but was built from different source bytes.
    Stale {
        /// Absolute source path.
        source: PathBuf,
        /// Absolute cache path.
        cache: PathBuf,
    },
    /// The source exists but has never been cached.
    Missing {
        /// Absolute source path.
        source: PathBuf,
        /// Absolute cache path that a load would create.
        cache: PathBuf,
    },
}

/// The source selected for a request and where its cache lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Absolute path of the first existing source candidate.
    pub source_path: PathBuf,
    /// Absolute path of its cache file.
    pub cache_path: PathBuf,
}

/// Loads one module through its cache.
pub struct CachingLoader<F, S = DigestStrategy> {
    request: LoaderRequest,
    format: F,
    strategy: S,
    layout: CacheLayout,
}

impl<F: Format> CachingLoader<F> {
    /// Creates a loader for `base` using the format's own suffixes and the
    /// default digest header and layout.
    pub fn new(base: impl Into<PathBuf>, format: F) -> Self {
        let request = LoaderRequest::new(base, format.suffixes().iter().copied());
        Self {
            request,
            format,
            strategy: DigestStrategy::default(),
            layout: CacheLayout::default(),
        }
    }
}

impl<F: Format, S: HeaderStrategy> CachingLoader<F, S> {
    /// Replaces the header strategy.
    pub fn with_strategy<T: HeaderStrategy>(self, strategy: T) -> CachingLoader<F, T> {
        CachingLoader {
            request: self.request,
            format: self.format,
            strategy,
            layout: self.layout,
        }
    }

    /// Overrides the suffixes supplied by the format.
    pub fn with_suffixes<I, T>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.request = LoaderRequest::new(self.request.base, suffixes);
        self
    }

    /// Replaces the cache layout.
    pub fn with_layout(mut self, layout: CacheLayout) -> Self {
        self.layout = layout;
        self
    }

    /// The request this loader serves.
    pub fn request(&self) -> &LoaderRequest {
        &self.request
    }

    /// The format plug-in.
    pub fn format(&self) -> &F {
        &self.format
    }

    /// The header strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Loads the program, from cache when fresh.
    pub fn load(&self) -> Result<F::Program, CacheError> {
        self.load_header_and_program().map(|loaded| loaded.program)
    }

    /// Loads the program and reports the header and how it was obtained.
    pub fn load_header_and_program(&self) -> Result<Loaded<S::Header, F::Program>, CacheError> {
        let Located {
            source_path,
            cache_path,
        } = self.locate()?;
        let source = read_source(&source_path)?;

        let reason = match store::read(&cache_path)? {
            None => CompileReason::Miss,
            Some(cached) => {
                let (header, body) = self.split_cache(&cache_path, &cached)?;
                let program = self.format.deserialize(body).map_err(|e| {
                    warn!(cache = %cache_path.display(), error = %e, "cached program failed to decode");
                    CacheError::MalformedCache {
                        path: cache_path.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if !header.is_out_of_date(&source) {
                    debug!(source = %source_path.display(), "reusing cached program");
                    return Ok(Loaded {
                        header,
                        program,
                        source_path,
                        cache_path,
                        outcome: LoadOutcome::Fresh,
                    });
                }
                CompileReason::Stale
            }
        };

        info!(source = %source_path.display(), reason = ?reason, "compiling");
        let program = self
            .format
            .compile(&source, &source_path)
            .map_err(|e| CacheError::Compile {
                path: source_path.clone(),
                source: Box::new(e),
            })?;
        let body = self
            .format
            .serialize(&program)
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;
        let header = self.strategy.from_source(&source);
        store::write_atomic(&cache_path, &header.add_header(&body))?;
        debug!(cache = %cache_path.display(), bytes = body.len(), "wrote cache");

        Ok(Loaded {
            header,
            program,
            source_path,
            cache_path,
            outcome: LoadOutcome::Compiled(reason),
        })
    }

    /// Reports the cache state of the module without compiling or decoding the body.
    pub fn status(&self) -> Result<CacheStatus, CacheError> {
        let Located {
            source_path,
            cache_path,
        } = self.locate()?;
        let Some(cached) = store::read(&cache_path)? else {
            return Ok(CacheStatus::Missing {
                source: source_path,
                cache: cache_path,
            });
        };
        let source = read_source(&source_path)?;
        let (header, _) = self.split_cache(&cache_path, &cached)?;
        if header.is_out_of_date(&source) {
            Ok(CacheStatus::Stale {
                source: source_path,
                cache: cache_path,
            })
        } else {
            Ok(CacheStatus::Fresh {
                source: source_path,
                cache: cache_path,
            })
        }
    }

    /// Absolute source paths for every candidate suffix, in priority order.
    pub fn source_candidates(&self) -> Result<Vec<PathBuf>, CacheError> {
        self.request
            .candidates()
            .map(|candidate| layout::absolute(&candidate))
            .collect()
    }

    /// Absolute cache paths for every candidate suffix, in priority order.
    pub fn cache_paths(&self) -> Result<Vec<PathBuf>, CacheError> {
        self.request
            .candidates()
            .map(|source| self.cache_path(&source))
            .collect()
    }

    /// Deletes the cache files of every candidate suffix, returning how many existed.
    ///
    /// Plain digest caches are removed too when the strategy writes its own
    /// family, so switching strategies leaves nothing behind.
    pub fn clean(&self) -> Result<usize, CacheError> {
        let mut targets = self.cache_paths()?;
        if self.strategy.family().is_some() {
            for source in self.request.candidates() {
                targets.push(self.layout.cache_path(&source)?);
            }
        }

        let mut removed = 0;
        for cache_path in targets {
            if store::remove(&cache_path)? {
                debug!(cache = %cache_path.display(), "removed cache file");
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Picks the first candidate whose source file exists.
    ///
    /// Fails with [`CacheError::NotFound`] listing every probed path if none does.
    pub fn locate(&self) -> Result<Located, CacheError> {
        let mut searched = Vec::with_capacity(self.request.suffixes.len());
        for candidate in self.request.candidates() {
            let source_path = layout::absolute(&candidate)?;
            if source_path.is_file() {
                let cache_path = self.cache_path(&source_path)?;
                debug!(source = %source_path.display(), cache = %cache_path.display(), "found source");
                return Ok(Located {
                    source_path,
                    cache_path,
                });
            }
            debug!(source = %source_path.display(), "source candidate absent");
            searched.push(source_path);
        }
        Err(CacheError::NotFound { searched })
    }

    fn cache_path(&self, source: &Path) -> Result<PathBuf, CacheError> {
        self.layout.family_cache_path(source, self.strategy.family())
    }

    fn split_cache<'a>(
        &self,
        cache_path: &Path,
        cached: &'a [u8],
    ) -> Result<(S::Header, &'a [u8]), CacheError> {
        self.strategy.split(cached).map_err(|e| {
            warn!(cache = %cache_path.display(), error = %e, "malformed cache header");
            CacheError::MalformedCache {
                path: cache_path.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }
}

fn read_source(path: &Path) -> Result<Vec<u8>, CacheError> {
    std::fs::read(path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameError;
    use crate::header::VersionedStrategy;
    use std::cell::Cell;

    /// Uppercases UTF-8 source and counts how often it had to.
    struct Shout {
        suffixes: Vec<&'static str>,
        compiles: Cell<usize>,
    }

    #[derive(Debug, thiserror::Error)]
    enum ShoutError {
        #[error("source is not UTF-8")]
        NotUtf8,
        #[error("refusing to compile: {0}")]
        Rejected(String),
    }

    impl Shout {
        fn new(suffixes: &[&'static str]) -> Self {
            Self {
                suffixes: suffixes.to_vec(),
                compiles: Cell::new(0),
            }
        }
    }

    impl Format for Shout {
        type Program = String;
        type Error = ShoutError;

        fn suffixes(&self) -> &[&str] {
            &self.suffixes
        }

        fn compile(&self, src: &[u8], _path: &Path) -> Result<String, ShoutError> {
            self.compiles.set(self.compiles.get() + 1);
            let text = std::str::from_utf8(src).map_err(|_| ShoutError::NotUtf8)?;
            if text.starts_with("!") {
                return Err(ShoutError::Rejected(text.to_string()));
            }
            Ok(text.to_uppercase())
        }

        fn serialize(&self, program: &String) -> Result<Vec<u8>, ShoutError> {
            Ok(program.as_bytes().to_vec())
        }

        fn deserialize(&self, bytes: &[u8]) -> Result<String, ShoutError> {
            String::from_utf8(bytes.to_vec()).map_err(|_| ShoutError::NotUtf8)
        }
    }

    fn setup(suffixes: &[&'static str]) -> (tempfile::TempDir, CachingLoader<Shout>) {
        let dir = tempfile::tempdir().unwrap();
        let loader = CachingLoader::new(dir.path().join("conf"), Shout::new(suffixes));
        (dir, loader)
    }

    fn compiles<S: HeaderStrategy>(loader: &CachingLoader<Shout, S>) -> usize {
        loader.format().compiles.get()
    }

    #[test]
    fn first_load_compiles_and_writes_cache() {
        let (dir, loader) = setup(&[".txt"]);
        std::fs::write(dir.path().join("conf.txt"), "hello").unwrap();

        let loaded = loader.load_header_and_program().unwrap();
        assert_eq!(loaded.program, "HELLO");
        assert_eq!(loaded.outcome, LoadOutcome::Compiled(CompileReason::Miss));
        assert_eq!(
            loaded.cache_path,
            dir.path().join("__piecache__").join("conf.txt.v1.pie")
        );

        let cached = std::fs::read(&loaded.cache_path).unwrap();
        assert_eq!(cached, loaded.header.add_header(b"HELLO"));
        assert_eq!(compiles(&loader), 1);
    }

    #[test]
    fn second_load_reuses_cache() {
        let (dir, loader) = setup(&[".txt"]);
        std::fs::write(dir.path().join("conf.txt"), "hello").unwrap();

        assert_eq!(loader.load().unwrap(), "HELLO");
        let loaded = loader.load_header_and_program().unwrap();
        assert_eq!(loaded.program, "HELLO");
        assert_eq!(loaded.outcome, LoadOutcome::Fresh);
        assert_eq!(compiles(&loader), 1);
    }

    #[test]
    fn cache_survives_a_new_loader_instance() {
        let (dir, loader) = setup(&[".txt"]);
        std::fs::write(dir.path().join("conf.txt"), "hello").unwrap();
        loader.load().unwrap();

        let again = CachingLoader::new(dir.path().join("conf"), Shout::new(&[".txt"]));
        assert_eq!(again.load().unwrap(), "HELLO");
        assert_eq!(compiles(&again), 0);
    }

    #[test]
    fn changed_source_recompiles_and_overwrites() {
        let (dir, loader) = setup(&[".txt"]);
        let src = dir.path().join("conf.txt");
        std::fs::write(&src, "hello").unwrap();
        let first = loader.load_header_and_program().unwrap();

        std::fs::write(&src, "goodbye").unwrap();
        let second = loader.load_header_and_program().unwrap();
        assert_eq!(second.program, "GOODBYE");
        assert_eq!(second.outcome, LoadOutcome::Compiled(CompileReason::Stale));
        assert_eq!(compiles(&loader), 2);
        assert_ne!(first.header.digest(), second.header.digest());

        let cached = std::fs::read(&second.cache_path).unwrap();
        assert!(cached.ends_with(b"GOODBYE"));
    }

    #[test]
    fn first_existing_suffix_wins() {
        let (dir, loader) = setup(&[".yml", ".yaml"]);
        std::fs::write(dir.path().join("conf.yml"), "short").unwrap();
        std::fs::write(dir.path().join("conf.yaml"), "long").unwrap();

        let loaded = loader.load_header_and_program().unwrap();
        assert_eq!(loaded.program, "SHORT");
        assert!(loaded.source_path.ends_with("conf.yml"));
        assert!(!dir
            .path()
            .join("__piecache__")
            .join("conf.yaml.v1.pie")
            .exists());
    }

    #[test]
    fn falls_through_to_later_suffix() {
        let (dir, loader) = setup(&[".yml", ".yaml"]);
        std::fs::write(dir.path().join("conf.yaml"), "long").unwrap();

        let loaded = loader.load_header_and_program().unwrap();
        assert_eq!(loaded.program, "LONG");
        assert!(loaded.source_path.ends_with("conf.yaml"));
    }

    #[test]
    fn missing_source_lists_probed_paths() {
        let (dir, loader) = setup(&[".json"]);
        match loader.load() {
            Err(CacheError::NotFound { searched }) => {
                assert_eq!(searched, vec![dir.path().join("conf.json")]);
                assert!(searched[0].is_absolute());
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert_eq!(compiles(&loader), 0);
    }

    #[test]
    fn locate_reports_source_and_cache() {
        let (dir, loader) = setup(&[".yml", ".yaml"]);
        assert_eq!(
            loader.source_candidates().unwrap(),
            vec![dir.path().join("conf.yml"), dir.path().join("conf.yaml")]
        );
        std::fs::write(dir.path().join("conf.yaml"), "x").unwrap();

        let located = loader.locate().unwrap();
        assert_eq!(located.source_path, dir.path().join("conf.yaml"));
        assert_eq!(located.cache_path, loader.cache_paths().unwrap()[1]);
        assert!(!located.cache_path.parent().unwrap().exists());
    }

    #[test]
    fn missing_source_lists_every_suffix_in_order() {
        let (dir, loader) = setup(&[".yml", ".yaml"]);
        match loader.load() {
            Err(CacheError::NotFound { searched }) => assert_eq!(
                searched,
                vec![dir.path().join("conf.yml"), dir.path().join("conf.yaml")]
            ),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_cache_is_loud() {
        let (dir, loader) = setup(&[".txt"]);
        std::fs::write(dir.path().join("conf.txt"), "hello").unwrap();
        let cache_path = loader.cache_paths().unwrap().remove(0);
        std::fs::create_dir_all(cache_path.parent().unwrap()).unwrap();
        std::fs::write(&cache_path, b"not-a-header").unwrap();

        match loader.load() {
            Err(CacheError::MalformedCache { path, reason }) => {
                assert_eq!(path, cache_path);
                assert_eq!(reason, FrameError::MissingDelimiter.to_string());
            }
            other => panic!("expected MalformedCache, got {other:?}"),
        }
        assert_eq!(compiles(&loader), 0);
        assert_eq!(std::fs::read(&cache_path).unwrap(), b"not-a-header");
    }

    #[test]
    fn truncated_cache_is_loud() {
        let (dir, loader) = setup(&[".txt"]);
        std::fs::write(dir.path().join("conf.txt"), "hello").unwrap();
        let cache_path = loader.load_header_and_program().unwrap().cache_path;
        let cached = std::fs::read(&cache_path).unwrap();
        std::fs::write(&cache_path, &cached[..10]).unwrap();

        assert!(matches!(
            loader.load(),
            Err(CacheError::MalformedCache { .. })
        ));
    }

    #[test]
    fn undecodable_fresh_body_is_loud() {
        let (dir, loader) = setup(&[".txt"]);
        std::fs::write(dir.path().join("conf.txt"), "hello").unwrap();
        let cache_path = loader.cache_paths().unwrap().remove(0);
        let header = loader.strategy().from_source(b"hello");
        store::write_atomic(&cache_path, &header.add_header(&[0xff, 0xfe])).unwrap();

        assert!(matches!(
            loader.load(),
            Err(CacheError::MalformedCache { .. })
        ));
    }

    #[test]
    fn undecodable_stale_body_is_loud() {
        let (dir, loader) = setup(&[".txt"]);
        std::fs::write(dir.path().join("conf.txt"), "hello").unwrap();
        let cache_path = loader.cache_paths().unwrap().remove(0);
        let stale = loader.strategy().from_source(b"old source");
        let framed = stale.add_header(&[0xff, 0xff, 0xff]);
        store::write_atomic(&cache_path, &framed).unwrap();

        match loader.load() {
            Err(CacheError::MalformedCache { path, .. }) => assert_eq!(path, cache_path),
            other => panic!("expected MalformedCache, got {other:?}"),
        }
        assert_eq!(compiles(&loader), 0);
        assert_eq!(std::fs::read(&cache_path).unwrap(), framed);
    }

    #[test]
    fn orphaned_cache_is_ignored() {
        let (dir, loader) = setup(&[".yml", ".yaml"]);
        let yml_cache = loader.cache_paths().unwrap().remove(0);
        std::fs::create_dir_all(yml_cache.parent().unwrap()).unwrap();
        std::fs::write(&yml_cache, b"garbage without a source").unwrap();
        std::fs::write(dir.path().join("conf.yaml"), "long").unwrap();

        assert_eq!(loader.load().unwrap(), "LONG");
    }

    #[test]
    fn compile_error_propagates_and_keeps_old_cache() {
        let (dir, loader) = setup(&[".txt"]);
        let src = dir.path().join("conf.txt");
        std::fs::write(&src, "hello").unwrap();
        let cache_path = loader.load_header_and_program().unwrap().cache_path;
        let before = std::fs::read(&cache_path).unwrap();

        std::fs::write(&src, "!broken").unwrap();
        match loader.load() {
            Err(CacheError::Compile { path, source }) => {
                assert_eq!(path, src);
                assert!(source.to_string().contains("!broken"));
            }
            other => panic!("expected Compile, got {other:?}"),
        }
        assert_eq!(std::fs::read(&cache_path).unwrap(), before);
    }

    #[test]
    fn compile_error_on_miss_writes_nothing() {
        let (dir, loader) = setup(&[".txt"]);
        std::fs::write(dir.path().join("conf.txt"), [0xffu8, 0xfe]).unwrap();
        assert!(matches!(loader.load(), Err(CacheError::Compile { .. })));
        assert!(!loader.cache_paths().unwrap()[0].exists());
    }

    #[test]
    fn with_suffixes_overrides_format() {
        let (dir, loader) = setup(&[".txt"]);
        let loader = loader.with_suffixes([".text"]);
        std::fs::write(dir.path().join("conf.text"), "x").unwrap();
        assert_eq!(loader.request().suffixes(), [".text".to_string()]);
        assert_eq!(loader.load().unwrap(), "X");
    }

    #[test]
    fn custom_layout_moves_cache() {
        let (dir, loader) = setup(&[".txt"]);
        let loader = loader.with_layout(CacheLayout::new(".cache", "t"));
        std::fs::write(dir.path().join("conf.txt"), "x").unwrap();
        let loaded = loader.load_header_and_program().unwrap();
        assert_eq!(loaded.cache_path, dir.path().join(".cache").join("conf.txt.t.pie"));
        assert!(loaded.cache_path.exists());
    }

    #[test]
    fn versioned_strategy_recompiles_on_version_bump() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("conf.txt"), "hello").unwrap();
        let base = dir.path().join("conf");

        let v1 = CachingLoader::new(&base, Shout::new(&[".txt"]))
            .with_strategy(VersionedStrategy::new("1.0", DigestStrategy::default()));
        v1.load().unwrap();
        v1.load().unwrap();
        assert_eq!(compiles(&v1), 1);

        let v2 = CachingLoader::new(&base, Shout::new(&[".txt"]))
            .with_strategy(VersionedStrategy::new("2.0", DigestStrategy::default()));
        let loaded = v2.load_header_and_program().unwrap();
        assert_eq!(loaded.outcome, LoadOutcome::Compiled(CompileReason::Stale));
        assert_eq!(loaded.header.recorded_version(), "2.0");
    }

    #[test]
    fn versioned_caches_live_apart_from_plain_ones() {
        let (dir, plain) = setup(&[".txt"]);
        std::fs::write(dir.path().join("conf.txt"), "hello").unwrap();
        let plain_cache = plain.load_header_and_program().unwrap().cache_path;

        let versioned = CachingLoader::new(dir.path().join("conf"), Shout::new(&[".txt"]))
            .with_strategy(VersionedStrategy::new("1.0", DigestStrategy::default()));
        let loaded = versioned.load_header_and_program().unwrap();
        assert_eq!(loaded.outcome, LoadOutcome::Compiled(CompileReason::Miss));
        assert_eq!(
            loaded.cache_path,
            dir.path().join("__piecache__").join("conf.txt.v1-ver.pie")
        );
        assert_eq!(plain.load_header_and_program().unwrap().outcome, LoadOutcome::Fresh);

        assert_eq!(versioned.clean().unwrap(), 2);
        assert!(!plain_cache.exists());
    }

    #[test]
    fn status_tracks_cache_lifecycle() {
        let (dir, loader) = setup(&[".txt"]);
        assert!(matches!(loader.status(), Err(CacheError::NotFound { .. })));

        let src = dir.path().join("conf.txt");
        std::fs::write(&src, "hello").unwrap();
        assert!(matches!(loader.status().unwrap(), CacheStatus::Missing { .. }));

        loader.load().unwrap();
        assert!(matches!(loader.status().unwrap(), CacheStatus::Fresh { .. }));

        std::fs::write(&src, "changed").unwrap();
        assert!(matches!(loader.status().unwrap(), CacheStatus::Stale { .. }));
        assert_eq!(compiles(&loader), 1);
    }

    #[test]
    fn clean_removes_every_variant() {
        let (dir, loader) = setup(&[".yml", ".yaml"]);
        std::fs::write(dir.path().join("conf.yml"), "a").unwrap();
        loader.load().unwrap();
        std::fs::remove_file(dir.path().join("conf.yml")).unwrap();
        std::fs::write(dir.path().join("conf.yaml"), "b").unwrap();
        loader.load().unwrap();

        assert_eq!(loader.clean().unwrap(), 2);
        assert_eq!(loader.clean().unwrap(), 0);
        assert!(loader.cache_paths().unwrap().iter().all(|p| !p.exists()));
    }

    #[test]
    fn outcome_display() {
        assert_eq!(LoadOutcome::Fresh.to_string(), "fresh");
        assert_eq!(
            LoadOutcome::Compiled(CompileReason::Stale).to_string(),
            "compiled (stale cache)"
        );
    }
}
