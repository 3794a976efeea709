//! Lifecycle classification of a single release cycle
//!
//! Milestone fields are first decoded into a [`LifecycleField`], so the status
//! rules below never look at raw JSON shapes.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::registry::types::{Cycle, DateOrBool};

/// Lifecycle status of a release cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EolStatus {
    Active,
    ApproachingEol,
    EndOfLife,
    Unknown,
}

impl EolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EolStatus::Active => "active",
            EolStatus::ApproachingEol => "approaching_eol",
            EolStatus::EndOfLife => "end_of_life",
            EolStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded form of a date-or-boolean milestone field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleField {
    /// Field missing, null or blank
    Absent,
    Flag(bool),
    Date(NaiveDate),
    /// Present but not a boolean or a recognizable date
    Invalid(String),
}

impl LifecycleField {
    pub fn decode(raw: Option<&DateOrBool>) -> Self {
        match raw {
            None => LifecycleField::Absent,
            Some(DateOrBool::Bool(flag)) => LifecycleField::Flag(*flag),
            Some(DateOrBool::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    LifecycleField::Absent
                } else if text.eq_ignore_ascii_case("true") {
                    LifecycleField::Flag(true)
                } else if text.eq_ignore_ascii_case("false") {
                    LifecycleField::Flag(false)
                } else {
                    parse_date(text)
                        .map(LifecycleField::Date)
                        .unwrap_or_else(|| LifecycleField::Invalid(text.to_string()))
                }
            }
            Some(DateOrBool::Other(value)) => LifecycleField::Invalid(value.to_string()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            LifecycleField::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// True for `Flag(true)` or a date on or before `today`
    pub fn is_reached(&self, today: NaiveDate) -> bool {
        match self {
            LifecycleField::Flag(flag) => *flag,
            LifecycleField::Date(date) => *date <= today,
            _ => false,
        }
    }
}

/// Parse `YYYY-MM-DD` or a full ISO-8601 timestamp into a calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Result of applying the status rules to an `eol` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EolAssessment {
    pub status: EolStatus,
    pub eol_date: Option<NaiveDate>,
    pub days_until_eol: Option<i64>,
}

/// Classify an `eol` field against `today` and the approaching-EOL window.
///
/// Precedence:
/// 1. `true` → `EndOfLife` with unknown day count
/// 2. `false` or absent → `Active`
/// 3. a date → `EndOfLife` if past, `ApproachingEol` within the window, else `Active`
/// 4. anything else → `Unknown`
pub fn assess_eol(eol: &LifecycleField, today: NaiveDate, threshold_days: i64) -> EolAssessment {
    match eol {
        LifecycleField::Flag(true) => EolAssessment {
            status: EolStatus::EndOfLife,
            eol_date: None,
            days_until_eol: None,
        },
        LifecycleField::Flag(false) | LifecycleField::Absent => EolAssessment {
            status: EolStatus::Active,
            eol_date: None,
            days_until_eol: None,
        },
        LifecycleField::Date(date) => {
            let days = (*date - today).num_days();
            let status = if days < 0 {
                EolStatus::EndOfLife
            } else if days <= threshold_days {
                EolStatus::ApproachingEol
            } else {
                EolStatus::Active
            };
            EolAssessment {
                status,
                eol_date: Some(*date),
                days_until_eol: Some(days),
            }
        }
        LifecycleField::Invalid(_) => EolAssessment {
            status: EolStatus::Unknown,
            eol_date: None,
            days_until_eol: None,
        },
    }
}

/// LTS when `lts` is `true` or a non-falsy string (the LTS start date)
pub fn is_lts(lts: Option<&DateOrBool>) -> bool {
    match lts {
        Some(DateOrBool::Bool(flag)) => *flag,
        Some(DateOrBool::Text(text)) => {
            let text = text.trim();
            !text.is_empty() && !text.eq_ignore_ascii_case("false")
        }
        Some(DateOrBool::Other(_)) | None => false,
    }
}

/// Classified lifecycle facts about one cycle of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVersionInfo {
    pub product: String,
    pub cycle: String,
    pub status: EolStatus,
    pub eol_date: Option<String>,
    pub days_until_eol: Option<i64>,
    pub release_date: Option<String>,
    pub latest_version: Option<String>,
    pub is_lts: bool,
    pub support_date: Option<String>,
    pub link: Option<String>,
    pub discontinued_date: Option<String>,
    pub is_discontinued: bool,
    pub extended_support_date: Option<String>,
    pub has_extended_support: bool,
    pub latest_release_date: Option<String>,
    pub days_since_latest_release: Option<i64>,
    pub raw_data: Cycle,
}

impl ProductVersionInfo {
    /// Classify `cycle` as seen on `today`
    pub fn classify(
        product: &str,
        cycle: &Cycle,
        today: NaiveDate,
        eol_threshold_days: i64,
    ) -> Self {
        let eol = LifecycleField::decode(cycle.eol.as_ref());
        let support = LifecycleField::decode(cycle.support.as_ref());
        let discontinued = LifecycleField::decode(cycle.discontinued.as_ref());
        let extended_support = LifecycleField::decode(cycle.extended_support.as_ref());

        let assessment = assess_eol(&eol, today, eol_threshold_days);

        let days_since_latest_release = cycle
            .latest_release_date
            .as_deref()
            .and_then(parse_date)
            .map(|date| (today - date).num_days());

        let has_extended_support = match &extended_support {
            LifecycleField::Flag(flag) => *flag,
            LifecycleField::Date(date) => *date >= today,
            _ => false,
        };

        Self {
            product: product.to_string(),
            cycle: cycle.cycle.clone(),
            status: assessment.status,
            eol_date: assessment.eol_date.map(|d| d.to_string()),
            days_until_eol: assessment.days_until_eol,
            release_date: cycle.release_date.clone(),
            latest_version: cycle.latest.clone(),
            is_lts: is_lts(cycle.lts.as_ref()),
            support_date: support.date().map(|d| d.to_string()),
            link: cycle.link.clone(),
            discontinued_date: discontinued.date().map(|d| d.to_string()),
            is_discontinued: discontinued.is_reached(today),
            extended_support_date: extended_support.date().map(|d| d.to_string()),
            has_extended_support,
            latest_release_date: cycle.latest_release_date.clone(),
            days_since_latest_release,
            raw_data: cycle.clone(),
        }
    }

    /// Placeholder for a cycle whose data could not be fetched
    pub fn unknown(product: &str, cycle: &str) -> Self {
        Self {
            product: product.to_string(),
            cycle: cycle.to_string(),
            status: EolStatus::Unknown,
            eol_date: None,
            days_until_eol: None,
            release_date: None,
            latest_version: None,
            is_lts: false,
            support_date: None,
            link: None,
            discontinued_date: None,
            is_discontinued: false,
            extended_support_date: None,
            has_extended_support: false,
            latest_release_date: None,
            days_since_latest_release: None,
            raw_data: Cycle::bare(cycle),
        }
    }

    /// No release for longer than `threshold_days`; end-of-life cycles are never stale
    pub fn is_stale(&self, threshold_days: i64) -> bool {
        self.status != EolStatus::EndOfLife
            && self
                .days_since_latest_release
                .is_some_and(|days| days > threshold_days)
    }
}
