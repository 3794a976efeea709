//! Source trait the analyzer pulls cycle data from

#[cfg(test)]
use mockall::automock;

use crate::registry::error::RegistryError;
use crate::registry::types::Cycle;

/// Trait for fetching release cycles of a product
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CycleSource: Send + Sync {
    /// Fetches every cycle of a product, in registry order
    async fn product_cycles(&self, product: &str) -> Result<Vec<Cycle>, RegistryError>;

    /// Resolves a version string to the closest tracked cycle
    ///
    /// # Returns
    /// * `Ok(Some(cycle))` - The first fallback candidate that matched
    /// * `Ok(None)` - The product exists but no candidate is tracked
    /// * `Err(RegistryError)` - The registry could not be reached
    async fn cycle_for_version(
        &self,
        product: &str,
        version: &str,
        enable_fallback: bool,
    ) -> Result<Option<Cycle>, RegistryError>;
}
