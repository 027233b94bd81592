//! Semantic-version ordering for releases
//!
//! Update lists come from the update source unsorted and occasionally carry
//! malformed version strings, so the ordering must stay total: parseable
//! versions sort newest first, a parseable version sorts ahead of an
//! unparseable one, and two unparseable versions fall back to reverse
//! lexicographic comparison of the raw strings.

use std::cmp::Ordering;

use semver::Version;

use crate::cluster::{ConditionalUpdate, Release};

/// Order two releases newest first.
pub fn compare_descending(a: &Release, b: &Release) -> Ordering {
    match (Version::parse(&a.version), Version::parse(&b.version)) {
        (Ok(va), Ok(vb)) => vb.cmp(&va),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => b.version.cmp(&a.version),
    }
}

/// Sort a release list newest first.
pub fn sort_releases(releases: &mut [Release]) {
    releases.sort_by(compare_descending);
}

/// Sort conditional updates newest first by their release version.
pub fn sort_conditional_updates(updates: &mut [ConditionalUpdate]) {
    updates.sort_by(|a, b| compare_descending(&a.release, &b.release));
}
