//! Lifecycle registry access
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │   Client    │────▶│    Cache    │
//! │  (fetch)    │     │ (TTL, JSON) │
//! └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ CycleSource │◀──── analyzer
//! └─────────────┘
//! ```
//!
//! - [`client`]: HTTP client with semantic version fallback matching
//! - [`cache`]: per-client response cache with lazy expiry
//! - [`source`]: trait the analyzer consumes, implemented by the client
//! - [`types`]: `Cycle` records and v1 product listings decoded from loosely typed JSON
//! - [`error`]: registry error carrying status and product/cycle context

pub mod cache;
pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use cache::{CacheStats, ResponseCache};
pub use client::EndOfLifeClient;
pub use error::{RegistryError, RequestContext};
pub use source::CycleSource;
pub use types::{Cycle, DateOrBool, ProductDetails, ProductSummary};
