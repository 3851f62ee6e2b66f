//! Turning `pie.toml` into a cache layout and header strategy.

use std::path::{Path, PathBuf};

use pie_cache::{
    CacheError, CacheLayout, CachingLoader, DigestHeader, DigestStrategy, FrameError, Header,
    HeaderStrategy, VersionedHeader, VersionedStrategy,
};
use pie_common::SourceDigest;
use pie_config::{CacheConfig, PieConfig};
use pie_formats::DocumentFormat;

use crate::GlobalArgs;

/// Header strategy selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredStrategy {
    /// Digest-only headers.
    Digest(DigestStrategy),
    /// Digest headers pinned to a tool version.
    Versioned(VersionedStrategy<DigestStrategy>),
}

/// Header produced by [`ConfiguredStrategy`].
#[derive(Debug, Clone)]
pub enum ConfiguredHeader {
    /// Digest-only header.
    Digest(DigestHeader),
    /// Versioned header.
    Versioned(VersionedHeader<DigestHeader>),
}

impl ConfiguredHeader {
    /// The tool version recorded in the header, if any.
    pub fn recorded_version(&self) -> Option<String> {
        match self {
            ConfiguredHeader::Digest(_) => None,
            ConfiguredHeader::Versioned(h) => Some(h.recorded_version().into_owned()),
        }
    }
}

impl Header for ConfiguredHeader {
    fn is_out_of_date(&self, src: &[u8]) -> bool {
        match self {
            ConfiguredHeader::Digest(h) => h.is_out_of_date(src),
            ConfiguredHeader::Versioned(h) => h.is_out_of_date(src),
        }
    }

    fn add_header(&self, program: &[u8]) -> Vec<u8> {
        match self {
            ConfiguredHeader::Digest(h) => h.add_header(program),
            ConfiguredHeader::Versioned(h) => h.add_header(program),
        }
    }

    fn remove_header<'a>(&self, cache: &'a [u8]) -> Result<&'a [u8], FrameError> {
        match self {
            ConfiguredHeader::Digest(h) => h.remove_header(cache),
            ConfiguredHeader::Versioned(h) => h.remove_header(cache),
        }
    }

    fn digest(&self) -> &SourceDigest {
        match self {
            ConfiguredHeader::Digest(h) => h.digest(),
            ConfiguredHeader::Versioned(h) => h.digest(),
        }
    }
}

impl HeaderStrategy for ConfiguredStrategy {
    type Header = ConfiguredHeader;

    fn from_source(&self, src: &[u8]) -> ConfiguredHeader {
        match self {
            ConfiguredStrategy::Digest(s) => ConfiguredHeader::Digest(s.from_source(src)),
            ConfiguredStrategy::Versioned(s) => ConfiguredHeader::Versioned(s.from_source(src)),
        }
    }

    fn from_cache(&self, cache: &[u8]) -> Result<ConfiguredHeader, FrameError> {
        Ok(match self {
            ConfiguredStrategy::Digest(s) => ConfiguredHeader::Digest(s.from_cache(cache)?),
            ConfiguredStrategy::Versioned(s) => {
                ConfiguredHeader::Versioned(s.from_cache(cache)?)
            }
        })
    }

    fn family(&self) -> Option<&str> {
        match self {
            ConfiguredStrategy::Digest(s) => s.family(),
            ConfiguredStrategy::Versioned(s) => s.family(),
        }
    }
}

/// Effective cache settings for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where cache files live.
    pub layout: CacheLayout,
    /// How cache headers are built.
    pub strategy: ConfiguredStrategy,
    /// The configuration file that was read, if any.
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Reads `--config` if given, else `./pie.toml` if present, else defaults.
    pub fn resolve(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let (config, config_path) = match &global.config {
            Some(path) => (pie_config::load_config(path)?, Some(path.clone())),
            None => pie_config::find_config(&std::env::current_dir()?)?,
        };
        Ok(Self::from_config(&config, config_path))
    }

    /// Builds settings from an already parsed configuration.
    pub fn from_config(config: &PieConfig, config_path: Option<PathBuf>) -> Self {
        let CacheConfig {
            dir,
            tag,
            key,
            tool_version,
        } = &config.cache;
        let digest = DigestStrategy::with_key(key);
        let strategy = match tool_version {
            Some(version) => {
                ConfiguredStrategy::Versioned(VersionedStrategy::new(version.clone(), digest))
            }
            None => ConfiguredStrategy::Digest(digest),
        };
        Self {
            layout: CacheLayout::new(dir.clone(), tag.clone()),
            strategy,
            config_path,
        }
    }

    /// Where `source` is cached under these settings.
    pub fn cache_path(&self, source: &Path) -> Result<PathBuf, CacheError> {
        self.layout.family_cache_path(source, self.strategy.family())
    }

    /// Builds a loader for `base`, optionally overriding the format's suffixes.
    pub fn loader(
        &self,
        base: &Path,
        format: DocumentFormat,
        suffixes: &[String],
    ) -> CachingLoader<DocumentFormat, ConfiguredStrategy> {
        let loader = CachingLoader::new(base, format)
            .with_layout(self.layout.clone())
            .with_strategy(self.strategy.clone());
        if suffixes.is_empty() {
            loader
        } else {
            loader.with_suffixes(suffixes.iter().cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_plain_digest() {
        let settings = Settings::from_config(&PieConfig::default(), None);
        assert_eq!(settings.layout, CacheLayout::default());
        assert!(matches!(settings.strategy, ConfiguredStrategy::Digest(_)));
    }

    #[test]
    fn tool_version_selects_versioned_headers() {
        let config = pie_config::load_config_from_str(
            "[cache]\ndir = \".cache\"\ntag = \"t\"\ntool_version = \"2.0\"\n",
        )
        .unwrap();
        let settings = Settings::from_config(&config, None);
        assert_eq!(settings.layout, CacheLayout::new(".cache", "t"));

        let header = settings.strategy.from_source(b"src");
        assert_eq!(header.recorded_version().as_deref(), Some("2.0"));
        let framed = header.add_header(b"body");
        let (decoded, body) = settings.strategy.split(&framed).unwrap();
        assert_eq!(body, b"body");
        assert!(!decoded.is_out_of_date(b"src"));
    }

    #[test]
    fn loader_honours_layout_and_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("conf.jsn"), "{\"a\": 1}").unwrap();
        let config = pie_config::load_config_from_str("[cache]\ndir = \"c\"\n").unwrap();
        let settings = Settings::from_config(&config, None);

        let loader = settings.loader(
            &dir.path().join("conf"),
            DocumentFormat::Json,
            &[".jsn".to_string()],
        );
        let loaded = loader.load_header_and_program().unwrap();
        assert_eq!(loaded.cache_path, dir.path().join("c").join("conf.jsn.v1.pie"));
        assert!(loaded.header.recorded_version().is_none());
    }

    #[test]
    fn tool_version_moves_cache_path() {
        let plain = Settings::from_config(&PieConfig::default(), None);
        let config =
            pie_config::load_config_from_str("[cache]\ntool_version = \"2.0\"\n").unwrap();
        let versioned = Settings::from_config(&config, None);

        let source = Path::new("/srv/conf.json");
        assert_eq!(
            plain.cache_path(source).unwrap(),
            PathBuf::from("/srv/__piecache__/conf.json.v1.pie")
        );
        assert_eq!(
            versioned.cache_path(source).unwrap(),
            PathBuf::from("/srv/__piecache__/conf.json.v1-ver.pie")
        );
    }
}
