//! Cache headers: when is a cached artifact still valid for its source?
//!
//! A [`HeaderStrategy`] builds headers, either fresh from source bytes or by
//! decoding the front of a cache file. The [`Header`] it produces answers the
//! freshness question and frames itself in front of artifact bytes.

use std::borrow::Cow;
use std::sync::Arc;

use pie_common::{SourceDigest, DIGEST_KEY};

use crate::frame::{self, FrameError};

/// A decoded or freshly computed cache header.
pub trait Header {
    /// Returns `true` if `src` is not the source this header was derived from.
    fn is_out_of_date(&self, src: &[u8]) -> bool;

    /// Returns the full cache file contents: this header framed before `program`.
    fn add_header(&self, program: &[u8]) -> Vec<u8>;

    /// Strips the header frames from a cache file, returning the artifact bytes.
    fn remove_header<'a>(&self, cache: &'a [u8]) -> Result<&'a [u8], FrameError>;

    /// The source digest recorded in this header.
    fn digest(&self) -> &SourceDigest;
}

/// Builds [`Header`]s. Injected into the loader as an explicit value.
pub trait HeaderStrategy {
    /// The header type this strategy produces.
    type Header: Header;

    /// Derives a header that is fresh for exactly `src`.
    fn from_source(&self, src: &[u8]) -> Self::Header;

    /// Decodes the header at the front of a cache file.
    fn from_cache(&self, cache: &[u8]) -> Result<Self::Header, FrameError>;

    /// Name of the cache file family this strategy writes, if it differs from
    /// the plain digest layout.
    ///
    /// Strategies whose frames cannot be read by one another must return
    /// distinct families so their cache files never share a path.
    fn family(&self) -> Option<&str> {
        None
    }

    /// Decodes the header and returns it along with the artifact bytes.
    fn split<'a>(&self, cache: &'a [u8]) -> Result<(Self::Header, &'a [u8]), FrameError> {
        let header = self.from_cache(cache)?;
        let body = header.remove_header(cache)?;
        Ok((header, body))
    }
}

/// The standard strategy: a keyed digest of the source bytes.
#[derive(Debug, Clone)]
pub struct DigestStrategy {
    key: Arc<[u8]>,
}

impl DigestStrategy {
    /// Creates a strategy digesting with a custom salt instead of [`DIGEST_KEY`].
    pub fn with_key(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: Arc::from(key.as_ref()),
        }
    }

    /// Returns the digest salt.
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

impl Default for DigestStrategy {
    fn default() -> Self {
        Self::with_key(DIGEST_KEY)
    }
}

impl HeaderStrategy for DigestStrategy {
    type Header = DigestHeader;

    fn from_source(&self, src: &[u8]) -> DigestHeader {
        DigestHeader {
            digest: SourceDigest::keyed(&self.key, src),
            key: Arc::clone(&self.key),
        }
    }

    fn from_cache(&self, cache: &[u8]) -> Result<DigestHeader, FrameError> {
        let (digest, _) = frame::decode(cache)?;
        Ok(DigestHeader {
            digest: SourceDigest::from_raw(digest),
            key: Arc::clone(&self.key),
        })
    }
}

/// Header holding a keyed digest of the source it was built from.
#[derive(Debug, Clone)]
pub struct DigestHeader {
    digest: SourceDigest,
    key: Arc<[u8]>,
}

impl Header for DigestHeader {
    fn is_out_of_date(&self, src: &[u8]) -> bool {
        SourceDigest::keyed(&self.key, src) != self.digest
    }

    fn add_header(&self, program: &[u8]) -> Vec<u8> {
        frame::encode(self.digest.as_bytes(), program)
    }

    fn remove_header<'a>(&self, cache: &'a [u8]) -> Result<&'a [u8], FrameError> {
        frame::decode(cache).map(|(_, body)| body)
    }

    fn digest(&self) -> &SourceDigest {
        &self.digest
    }
}

/// Cache file family written by [`VersionedStrategy`].
pub const VERSIONED_FAMILY: &str = "ver";

/// Wraps another strategy and additionally pins the tool version.
///
/// The version is stored in its own frame ahead of the inner header, so a
/// cache written by a different tool version is stale even when the source
/// digest still matches. Versioned caches live in the [`VERSIONED_FAMILY`]
/// family, apart from plain digest caches of the same source.
#[derive(Debug, Clone)]
pub struct VersionedStrategy<S = DigestStrategy> {
    version: Arc<str>,
    inner: S,
}

impl<S: HeaderStrategy> VersionedStrategy<S> {
    /// Creates a strategy recording `version` in front of `inner`'s header.
    pub fn new(version: impl Into<String>, inner: S) -> Self {
        let version: String = version.into();
        Self {
            version: Arc::from(version),
            inner,
        }
    }

    /// The version written into new headers.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl<S: HeaderStrategy> HeaderStrategy for VersionedStrategy<S> {
    type Header = VersionedHeader<S::Header>;

    fn from_source(&self, src: &[u8]) -> Self::Header {
        VersionedHeader {
            recorded: self.version.as_bytes().to_vec(),
            current: Arc::clone(&self.version),
            inner: self.inner.from_source(src),
        }
    }

    fn from_cache(&self, cache: &[u8]) -> Result<Self::Header, FrameError> {
        let (recorded, rest) = frame::decode(cache)?;
        Ok(VersionedHeader {
            recorded: recorded.to_vec(),
            current: Arc::clone(&self.version),
            inner: self.inner.from_cache(rest)?,
        })
    }

    fn family(&self) -> Option<&str> {
        Some(VERSIONED_FAMILY)
    }
}

/// Header produced by [`VersionedStrategy`].
#[derive(Debug, Clone)]
pub struct VersionedHeader<H> {
    recorded: Vec<u8>,
    current: Arc<str>,
    inner: H,
}

impl<H> VersionedHeader<H> {
    /// The tool version stored in the cache file.
    pub fn recorded_version(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.recorded)
    }

    /// The wrapped header.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: Header> Header for VersionedHeader<H> {
    fn is_out_of_date(&self, src: &[u8]) -> bool {
        self.recorded != self.current.as_bytes() || self.inner.is_out_of_date(src)
    }

    fn add_header(&self, program: &[u8]) -> Vec<u8> {
        frame::encode(&self.recorded, &self.inner.add_header(program))
    }

    fn remove_header<'a>(&self, cache: &'a [u8]) -> Result<&'a [u8], FrameError> {
        let (_, rest) = frame::decode(cache)?;
        self.inner.remove_header(rest)
    }

    fn digest(&self) -> &SourceDigest {
        self.inner.digest()
    }
}
