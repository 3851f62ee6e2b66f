//! Keyed content digests for cache invalidation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

/// Version of the on-disk cache layout. Bump together with [`DIGEST_KEY`].
pub const FORMAT_VERSION: u32 = 1;

/// Default salt for source digests.
///
/// Every run sharing a cache directory must digest with the same key. The key
/// doubles as a format tag: changing it makes every existing cache entry stale,
/// so it is bumped whenever the artifact encoding changes incompatibly.
pub const DIGEST_KEY: &[u8] = b"pie-cache-v1";

type HmacSha256 = Hmac<Sha256>;

/// A keyed digest of source bytes, stored in every cache header.
///
/// The length is not fixed: headers frame the digest with an explicit byte
/// length, so the algorithm may change size between format versions.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SourceDigest(Vec<u8>);

impl SourceDigest {
    /// Computes HMAC-SHA256 of `data` keyed by `key`.
    pub fn keyed(key: &[u8], data: &[u8]) -> Self {
        let mut mac =
            HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
        mac.update(data);
        Self(mac.finalize().into_bytes().to_vec())
    }

    /// Computes the digest of `data` with the default [`DIGEST_KEY`].
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::keyed(DIGEST_KEY, data)
    }

    /// Wraps digest bytes read back from a cache file.
    pub fn from_raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the digest length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the digest holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SourceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for SourceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.get(..2) {
            Some(head) => write!(f, "SourceDigest({}..)", hex::encode(head)),
            None => write!(f, "SourceDigest({})", hex::encode(&self.0)),
        }
    }
}
