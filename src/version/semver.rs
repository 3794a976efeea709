//! Version string helpers shared by the registry client and the analyzer

use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

/// `major[.minor[.patch]][-prerelease][+build]`, numeric segments are plain digits
static SEMANTIC_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z][0-9A-Za-z.-]*))?(?:\+([0-9A-Za-z][0-9A-Za-z.-]*))?$",
    )
    .expect("semantic version pattern is valid")
});

/// Components of a (possibly partial) semantic version.
///
/// `minor` and `patch` stay `None` when the input omits them; they are never
/// zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionComponents {
    pub major: u64,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

/// Strip surrounding whitespace and a single leading `v`/`V`.
///
/// Never fails: input that is not a version comes back trimmed.
pub fn clean_version(version: &str) -> String {
    let trimmed = version.trim();
    trimmed
        .strip_prefix(['v', 'V'])
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Returns true when the cleaned string is `major[.minor[.patch]]` with optional suffixes
pub fn is_semantic_version(version: &str) -> bool {
    parse_semantic_version(version).is_some()
}

/// Parse a version into its components, or `None` if it is not semantic
pub fn parse_semantic_version(version: &str) -> Option<VersionComponents> {
    parse_cleaned(&clean_version(version))
}

/// Match an already cleaned version against the grammar. Segments overflowing
/// `u64` are rejected.
fn parse_cleaned(cleaned: &str) -> Option<VersionComponents> {
    let caps = SEMANTIC_VERSION_RE.captures(cleaned)?;

    let number = |idx: usize| -> Result<Option<u64>, std::num::ParseIntError> {
        caps.get(idx).map(|m| m.as_str().parse::<u64>()).transpose()
    };

    Some(VersionComponents {
        major: caps.get(1)?.as_str().parse().ok()?,
        minor: number(2).ok()?,
        patch: number(3).ok()?,
        prerelease: caps.get(4).map(|m| m.as_str().to_string()),
        build: caps.get(5).map(|m| m.as_str().to_string()),
    })
}

/// Candidate cycle identifiers, most specific first.
///
/// `"1.2.3"` yields `["1.2.3", "1.2", "1"]`. Shorter candidates are truncations
/// of the input text, so `"22.04.3"` yields `"22.04"`. The input is cleaned once;
/// non-semantic input yields only itself so the caller still attempts an exact
/// match.
pub fn get_semantic_fallbacks(version: &str) -> Vec<String> {
    let cleaned = clean_version(version);
    if parse_cleaned(&cleaned).is_none() {
        return vec![cleaned];
    }
    let Some(caps) = SEMANTIC_VERSION_RE.captures(&cleaned) else {
        return vec![cleaned];
    };

    let major = caps[1].to_string();
    let major_minor = caps.get(2).map(|minor| format!("{major}.{}", minor.as_str()));

    let mut candidates = vec![cleaned.clone()];
    for candidate in major_minor.into_iter().chain([major]) {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    candidates
}

/// Parse a version into a `semver::Version` for ordering, padding partial versions.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "v1.2" -> Version(1, 2, 0)
/// - "1.2.3" -> Version(1, 2, 3)
pub fn comparable_version(version: &str) -> Option<Version> {
    let parts = parse_semantic_version(version)?;
    let mut normalized = format!(
        "{}.{}.{}",
        parts.major,
        parts.minor.unwrap_or(0),
        parts.patch.unwrap_or(0)
    );
    if let Some(pre) = &parts.prerelease {
        normalized.push('-');
        normalized.push_str(pre);
    }
    if let Some(build) = &parts.build {
        normalized.push('+');
        normalized.push_str(build);
    }
    Version::parse(&normalized).ok()
}

/// Pick the highest version from a list of version strings.
///
/// Semantic versions win over anything unparseable; among unparseable values the
/// first one is kept. Ties keep the earliest entry.
pub fn highest_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, Option<Version>)> = None;

    for candidate in versions {
        let parsed = comparable_version(candidate);
        best = match best {
            None => Some((candidate, parsed)),
            Some((current, current_parsed)) => {
                let replace = match (&parsed, &current_parsed) {
                    (Some(new), Some(old)) => new > old,
                    (Some(_), None) => true,
                    _ => false,
                };
                if replace {
                    Some((candidate, parsed))
                } else {
                    Some((current, current_parsed))
                }
            }
        };
    }

    best.map(|(version, _)| version)
}
