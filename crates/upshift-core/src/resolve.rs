//! Target resolution
//!
//! Turns user intent plus the cluster snapshot into a concrete release to
//! request, an "already there" no-op, or a structured no-match failure. The
//! recommended-update scan always has precedence over the conditional scan;
//! a conditional match is never preferred even when it is newer.

use crate::cluster::{ClusterVersionStatus, Release};
use crate::conditions::{ClusterConditionType, RECOMMENDED};
use crate::error::{Result, UpgradeError};
use crate::reference::{target_match, validate_pull_spec};
use crate::version::sort_releases;

/// What the operator asked for. Modes are mutually exclusive by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Cancel a pending update request.
    Clear,
    /// Move to the newest available update.
    ToLatest,
    /// Move to an exact version from the update lists.
    ToVersion(String),
    /// Move to a release image.
    ToImage(String),
    /// Report status without mutating anything.
    StatusOnly,
}

/// Modifier flags accompanying an intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeOptions {
    /// Disable server-side verification and precondition checks.
    pub force: bool,

    /// Accept an image target that matched nothing in the update lists.
    pub allow_explicit_upgrade: bool,

    /// Proceed despite blocking cluster conditions.
    pub allow_upgrade_with_warnings: bool,

    /// Show not-recommended updates in the status report.
    pub include_not_recommended: bool,

    /// Accept a conditional update the cluster recommends against.
    pub allow_not_recommended: bool,
}

/// Outcome of target resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The cluster is already where the operator asked it to be.
    AlreadyAt { message: String },
    /// A concrete release to request.
    Target(Release),
}

/// Validate user-supplied intent before any cluster read.
///
/// Returns the warnings to surface when validation passes.
pub fn validate_intent(intent: &Intent, options: &UpgradeOptions) -> Result<Vec<String>> {
    match intent {
        Intent::ToVersion(version) => {
            semver::Version::parse(version)
                .map_err(|err| UpgradeError::InvalidVersion { reason: err.to_string() })?;
            Ok(Vec::new())
        }
        Intent::ToImage(image) => validate_pull_spec(image, options.force),
        _ => Ok(Vec::new()),
    }
}

/// Resolve the "latest" intent: newest available update, or a no-op when
/// the list is empty.
pub fn resolve_latest(status: &ClusterVersionStatus) -> Resolution {
    if status.available_updates.is_empty() {
        return Resolution::AlreadyAt {
            message: format!(
                "The cluster is already at the latest available version {}",
                status.desired.display_name()
            ),
        };
    }

    let mut candidates = status.available_updates.clone();
    sort_releases(&mut candidates);
    tracing::debug!(version = %candidates[0].version, "resolved latest update target");
    Resolution::Target(candidates[0].clone())
}

/// Resolve an explicit version or image intent against the update lists.
///
/// Matcher failures while scanning are surfaced through `warnings` and the
/// scan continues; only an exhausted scan produces an error.
pub fn resolve_explicit(
    status: &ClusterVersionStatus,
    to: &str,
    to_image: &str,
    options: &UpgradeOptions,
    warnings: &mut Vec<String>,
) -> Result<Resolution> {
    if !to.is_empty() && to == status.desired.version {
        return Ok(Resolution::AlreadyAt {
            message: format!("The cluster is already at version {to}"),
        });
    }
    if !to_image.is_empty() && to_image == status.desired.image {
        return Ok(Resolution::AlreadyAt {
            message: format!("The cluster is already at {to_image}"),
        });
    }

    let mut possible_targets = Vec::new();
    let mut chosen: Option<Release> = None;

    for available in &status.available_updates {
        match target_match(available, to, to_image) {
            Ok(true) => {
                chosen = Some(available.clone());
                break;
            }
            Ok(false) => {}
            Err(err) => warnings.push(format!(
                "unable to calculate match for the update target in available updates: {err}"
            )),
        }
        possible_targets.push(available.version.clone());
    }

    if chosen.is_none() {
        // The target was not recommended; consider conditional updates the
        // cluster recommends against.
        for conditional in &status.conditional_updates {
            let Some(condition) = conditional.conditions.find(RECOMMENDED) else {
                continue;
            };
            if condition.is_true() {
                continue;
            }

            match target_match(&conditional.release, to, to_image) {
                Ok(true) => {
                    if !options.allow_not_recommended {
                        return Err(UpgradeError::NotRecommended {
                            version: conditional.release.version.clone(),
                            condition_type: condition.condition_type.clone(),
                            status: condition.status.to_string(),
                            reason: condition.reason.clone(),
                            message: condition.indented_message(),
                        });
                    }
                    warnings.push(format!(
                        "with --allow-not-recommended you have accepted the risks with {} and bypassed {}={} {}: {}",
                        conditional.release.display_name(),
                        condition.condition_type,
                        condition.status,
                        condition.reason,
                        condition.message
                    ));
                    chosen = Some(conditional.release.clone());
                    break;
                }
                Ok(false) => {}
                Err(err) => warnings.push(format!(
                    "unable to calculate match for the update target in conditional updates: {err}"
                )),
            }
            if options.allow_not_recommended {
                possible_targets.push(conditional.release.version.clone());
            }
        }
    }

    if chosen.is_none() && !to_image.is_empty() && options.allow_explicit_upgrade {
        warnings.push(
            "the requested update image is not one of the available updates; \
             --allow-explicit-upgrade skipped the safety match against the update lists"
                .to_string(),
        );
        chosen = Some(Release {
            version: String::new(),
            image: to_image.to_string(),
            channels: Vec::new(),
        });
    }

    let Some(release) = chosen else {
        possible_targets.sort();
        possible_targets.dedup();

        let next_step = if to_image.is_empty() {
            "a release image with 'upshift image PULLSPEC' to continue with the update".to_string()
        } else {
            "--allow-explicit-upgrade to continue with the update".to_string()
        };

        let retrieved = status.conditions.get(ClusterConditionType::RetrievedUpdates);
        return Err(match retrieved {
            Some(condition) if !condition.is_true() => UpgradeError::UpdatesNotRetrieved {
                reason: condition.reason.clone(),
                message: condition.indented_message(),
                next_step,
            },
            _ if possible_targets.is_empty() && options.allow_not_recommended => {
                UpgradeError::NoRecommendedOrConditionalTargets { next_step }
            }
            _ if possible_targets.is_empty() => UpgradeError::NoRecommendedTargets { next_step },
            _ => UpgradeError::NotATarget { targets: possible_targets, next_step },
        });
    };

    tracing::debug!(version = %release.version, image = %release.image, "resolved explicit update target");
    Ok(Resolution::Target(release))
}
