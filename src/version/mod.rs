//! Version string utilities
//!
//! Pure helpers with no I/O. The registry client uses them for its fallback
//! cascade and the analyzer uses them to pick the newest `latest` value.
//!
//! - [`semver`]: cleaning, parsing, fallback candidates and ordering

pub mod semver;

pub use semver::{
    VersionComponents, clean_version, get_semantic_fallbacks, is_semantic_version,
    parse_semantic_version,
};
