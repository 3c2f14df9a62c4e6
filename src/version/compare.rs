//! Dotted numeric version comparison
//!
//! Versions are compared component by component as unsigned integers.
//! Parsing is tolerant: a segment that is not a plain number (`"0rc1"`,
//! `"post1"`, an empty segment) counts as `0`.

use std::cmp::Ordering;

/// Version returned by [`max_version`] when there is nothing to compare
pub const ZERO_VERSION: &str = "0.0";

/// Severity bucket for the distance between a pinned and a latest version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriftKind {
    /// First difference in the major component
    Major,
    /// First difference in the minor component
    Minor,
    /// First difference in the patch component
    Patch,
    /// Overlapping components are all equal
    None,
    /// Difference beyond the patch component, or no latest version to compare
    Unknown,
}

impl DriftKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftKind::Major => "Major",
            DriftKind::Minor => "Minor",
            DriftKind::Patch => "Patch",
            DriftKind::None => "None",
            DriftKind::Unknown => "Unknown",
        }
    }

    fn from_index(index: usize) -> Self {
        match index {
            0 => DriftKind::Major,
            1 => DriftKind::Minor,
            2 => DriftKind::Patch,
            _ => DriftKind::Unknown,
        }
    }
}

/// Result of comparing a pinned version against the latest version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drift {
    pub kind: DriftKind,
    /// Zero-based position of the first component that differs
    pub differing_index: Option<usize>,
}

impl Drift {
    /// Drift for a package whose latest version could not be determined
    pub fn unknown() -> Self {
        Self {
            kind: DriftKind::Unknown,
            differing_index: None,
        }
    }

    /// Whether the drift is Major, Minor or Patch
    pub fn is_outdated(&self) -> bool {
        matches!(
            self.kind,
            DriftKind::Major | DriftKind::Minor | DriftKind::Patch
        )
    }
}

/// Parse a dotted version string into numeric components
///
/// Examples:
/// - "2.10.1" -> [2, 10, 1]
/// - "1.0rc1" -> [1, 0]
/// - "" -> [0]
pub fn parse_components(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map(|segment| segment.trim().parse::<u64>().unwrap_or(0))
        .collect()
}

/// Index of the first overlapping component where the two versions differ
fn first_difference(a: &[u64], b: &[u64]) -> Option<usize> {
    a.iter().zip(b).position(|(x, y)| x != y)
}

/// Classify how far `pinned` has drifted from `latest`
///
/// Only the overlapping components are scanned. `"1.2"` against `"1.2.5"`
/// is `None`: the shorter version says nothing about the third component.
pub fn compare(pinned: &str, latest: &str) -> Drift {
    let pinned = parse_components(pinned);
    let latest = parse_components(latest);

    match first_difference(&pinned, &latest) {
        Some(index) => Drift {
            kind: DriftKind::from_index(index),
            differing_index: Some(index),
        },
        None => Drift {
            kind: DriftKind::None,
            differing_index: None,
        },
    }
}

/// Numeric, component-wise ordering of two version strings
///
/// Missing trailing components count as `0`, so `"1.0"` and `"1.0.0"`
/// compare equal.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = parse_components(a);
    let b = parse_components(b);
    let len = a.len().max(b.len());

    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Ordering used to pick the latest release
///
/// Numeric ties prefer the shorter string, then the lexicographically smaller
/// one, so `"2.0"` beats `"2.0rc1"` regardless of iteration order.
fn release_order(a: &str, b: &str) -> Ordering {
    compare_versions(a, b)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| b.cmp(a))
}

/// Select the highest version, or `"0.0"` when there are none
pub fn max_version<I, S>(versions: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    versions
        .into_iter()
        .fold(None::<S>, |best, candidate| match best {
            Some(best) if release_order(candidate.as_ref(), best.as_ref()).is_le() => Some(best),
            _ => Some(candidate),
        })
        .map(|best| best.as_ref().to_string())
        .unwrap_or_else(|| ZERO_VERSION.to_string())
}
