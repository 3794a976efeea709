use std::fmt;

use thiserror::Error;

/// Product and cycle that a registry request was made for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub product: Option<String>,
    pub cycle: Option<String>,
}

impl RequestContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn product(product: &str) -> Self {
        Self {
            product: Some(product.to_string()),
            cycle: None,
        }
    }

    pub fn cycle(product: &str, cycle: &str) -> Self {
        Self {
            product: Some(product.to_string()),
            cycle: Some(cycle.to_string()),
        }
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.product, &self.cycle) {
            (Some(product), Some(cycle)) => write!(f, " (product: {product}, cycle: {cycle})"),
            (Some(product), None) => write!(f, " (product: {product})"),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {source}{context}")]
    Network {
        #[source]
        source: reqwest::Error,
        context: RequestContext,
    },

    #[error("Registry returned status {status}{context}")]
    Status { status: u16, context: RequestContext },

    #[error("Invalid response: {message}{context}")]
    InvalidResponse {
        message: String,
        context: RequestContext,
    },
}

impl RegistryError {
    pub fn network(source: reqwest::Error, context: RequestContext) -> Self {
        Self::Network { source, context }
    }

    /// HTTP status code, when the registry answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network { source, .. } => source.status().map(|s| s.as_u16()),
            Self::InvalidResponse { .. } => None,
        }
    }

    pub fn context(&self) -> &RequestContext {
        match self {
            Self::Network { context, .. }
            | Self::Status { context, .. }
            | Self::InvalidResponse { context, .. } => context,
        }
    }

    pub fn product(&self) -> Option<&str> {
        self.context().product.as_deref()
    }

    pub fn cycle(&self) -> Option<&str> {
        self.context().cycle.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
