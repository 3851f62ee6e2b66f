//! Shared foundational types used across the pie artifact cache.
//!
//! This crate provides the keyed source digest that decides cache freshness,
//! together with the constants that version the on-disk cache format.

#![warn(missing_docs)]

pub mod digest;

pub use digest::{SourceDigest, DIGEST_KEY, FORMAT_VERSION};
