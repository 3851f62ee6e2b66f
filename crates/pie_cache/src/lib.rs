//! Compile-once, reuse-until-stale artifact caching.
//!
//! A [`CachingLoader`] turns a source file of some pluggable [`Format`] into
//! an in-memory program, either by decoding a cached artifact whose
//! [`Header`] says it is still fresh, or by compiling the source and writing a
//! new framed artifact next to it.

#![warn(missing_docs)]

pub mod error;
pub mod frame;
pub mod header;
pub mod layout;
pub mod loader;
pub mod store;

pub use error::CacheError;
pub use frame::FrameError;
pub use header::{
    DigestHeader, DigestStrategy, Header, HeaderStrategy, VersionedHeader, VersionedStrategy,
    VERSIONED_FAMILY,
};
pub use layout::CacheLayout;
pub use loader::{
    CacheStatus, CachingLoader, CompileReason, Format, LoadOutcome, Loaded, LoaderRequest, Located,
};
