//! Release cycle records as served by the lifecycle registry
//!
//! Upstream data is loosely typed: `cycle` may be a number, milestone fields may
//! be a date string or a boolean, and free-text fields occasionally arrive as
//! numbers. Everything is normalized here so the rest of the crate only sees
//! `Cycle` and `DateOrBool`.

use serde::{Deserialize, Deserializer, Serialize};

/// Milestone field that is either a date string or a boolean flag.
///
/// `Other` keeps any unexpected JSON shape so that one odd record does not fail
/// the whole payload; it is classified as invalid later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateOrBool {
    Bool(bool),
    Text(String),
    Other(serde_json::Value),
}

/// A single release cycle of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    /// Cycle identifier, numbers are converted to their string form
    #[serde(deserialize_with = "scalar_string")]
    pub cycle: String,
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eol: Option<DateOrBool>,
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub latest: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_release_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lts: Option<DateOrBool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<DateOrBool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discontinued: Option<DateOrBool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_support: Option<DateOrBool>,
}

impl Cycle {
    /// A cycle with only its identifier set
    pub fn bare(cycle: &str) -> Self {
        Self {
            cycle: cycle.to_string(),
            release_date: None,
            eol: None,
            latest: None,
            latest_release_date: None,
            link: None,
            lts: None,
            support: None,
            discontinued: None,
            extended_support: None,
        }
    }
}

/// Product entry of the v1 category and tag listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A product together with all of its release cycles (v1 `/products/full`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub releases: Vec<Cycle>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => Ok(s),
        Scalar::Number(n) => Ok(n.to_string()),
        Scalar::Other(v) => Err(serde::de::Error::custom(format!(
            "expected string or number for cycle, got {v}"
        ))),
    }
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => Some(s),
        Some(Scalar::Number(n)) => Some(n.to_string()),
        Some(Scalar::Other(_)) | None => None,
    })
}
