//! Image pull-spec parsing and target matching
//!
//! A pull spec is `registry/repository[:tag][@digest]`. Matching a requested
//! target against a candidate release compares versions exactly, then images
//! exactly, then content digests, so two differently-tagged references to
//! the same artifact still match.

use std::fmt;

use crate::cluster::Release;
use crate::error::{Result, UpgradeError};

/// A structured image pull spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageReference {
    /// Registry host, possibly with a port. Empty when the spec carries
    /// only a repository path.
    pub registry: String,
    pub repository: String,
    pub tag: Option<String>,
    /// Content-addressed identifier, e.g. `sha256:...`.
    pub digest: Option<String>,
}

impl ImageReference {
    /// Parse a pull spec.
    ///
    /// Parsing is lenient about a missing registry so that matching can
    /// still inspect repository-only references; [`validate_pull_spec`]
    /// applies the stricter rules for user-supplied targets.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason: &str| UpgradeError::InvalidPullSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        if spec.is_empty() {
            return Err(invalid("empty pull spec"));
        }

        let (remainder, digest) = match spec.split_once('@') {
            Some((_, digest)) if digest.contains('@') => {
                return Err(invalid("more than one digest separator"));
            }
            Some((remainder, digest)) => {
                if remainder.is_empty() {
                    return Err(invalid("no repository before the digest"));
                }
                if digest.is_empty() || !digest.contains(':') {
                    return Err(invalid("digest must be of the form algorithm:value"));
                }
                (remainder, Some(digest.to_string()))
            }
            None => (spec, None),
        };

        let (registry, rest) = match remainder.split_once('/') {
            Some((host, rest)) if looks_like_registry(host) => (host.to_string(), rest),
            _ => (String::new(), remainder),
        };

        let (repository, tag) = match rest.rsplit_once(':') {
            Some((repository, tag)) => {
                if repository.is_empty() {
                    return Err(invalid("no repository before the tag"));
                }
                if tag.is_empty() {
                    return Err(invalid("empty tag"));
                }
                (repository.to_string(), Some(tag.to_string()))
            }
            None => (rest.to_string(), None),
        };

        if repository.is_empty() {
            return Err(invalid("no repository specified"));
        }

        Ok(Self { registry, repository, tag, digest })
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.registry.is_empty() {
            write!(f, "{}/", self.registry)?;
        }
        f.write_str(&self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}

// A leading path component is a registry host when it could resolve as one.
fn looks_like_registry(host: &str) -> bool {
    host == "localhost" || host.contains('.') || host.contains(':')
}

/// Whether `candidate` satisfies the requested version or image target.
///
/// Empty `to` and `to_image` never match, even against a candidate whose own
/// fields are empty. A reference that fails to parse while an image target
/// is requested is an error, not a non-match, so callers can warn and keep
/// scanning.
pub fn target_match(candidate: &Release, to: &str, to_image: &str) -> Result<bool> {
    if !to.is_empty() && candidate.version == to {
        return Ok(true);
    }

    if !to_image.is_empty() {
        if candidate.image == to_image {
            return Ok(true);
        }

        let candidate_reference = ImageReference::parse(&candidate.image)?;
        let target_reference = ImageReference::parse(to_image)?;
        if let (Some(candidate_digest), Some(target_digest)) =
            (&candidate_reference.digest, &target_reference.digest)
        {
            if candidate_digest == target_digest {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Validate a user-supplied image target before any cluster read.
///
/// A valid target names a registry and repository and pins a tag or digest.
/// By-tag specs cannot be verified by the cluster, so they are refused
/// unless `force` is set, in which case a warning is returned instead.
pub fn validate_pull_spec(spec: &str, force: bool) -> Result<Vec<String>> {
    let reference = ImageReference::parse(spec)?;

    if reference.registry.is_empty() {
        return Err(UpgradeError::InvalidPullSpec {
            spec: spec.to_string(),
            reason: "no registry or repository specified".to_string(),
        });
    }

    match (&reference.tag, &reference.digest) {
        (None, None) => Err(UpgradeError::InvalidPullSpec {
            spec: spec.to_string(),
            reason: "no tag or digest specified".to_string(),
        }),
        (Some(_), None) if !force => Err(UpgradeError::UnverifiedTag { spec: spec.to_string() }),
        (Some(_), None) => Ok(vec![format!(
            "using the by-tag pull spec {spec} with --force; the cluster cannot verify it, a by-digest pull spec would be safer"
        )]),
        _ => Ok(Vec::new()),
    }
}
