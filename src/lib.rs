//! End-of-life checks for software release cycles
//!
//! Fetches lifecycle data from an endoflife.date compatible registry and
//! classifies each requested release cycle as active, approaching its end of
//! life, end-of-life, or unknown.
//!
//! ```text
//! ┌────────────┐    ┌────────────┐    ┌─────────────┐    ┌───────────────┐
//! │   config   │───▶│  analyzer  │───▶│  registry   │───▶│ HTTP registry │
//! │ (validate) │    │ (classify) │    │(fetch,cache)│    └───────────────┘
//! └────────────┘    └────────────┘    └─────────────┘
//!                         │                  │
//!                         ▼                  ▼
//!                   ActionResults     version (cleaning, fallbacks)
//! ```

pub mod analyzer;
pub mod config;
pub mod registry;
pub mod version;
