//! Update gating on cluster health conditions
//!
//! Before any resolved target is accepted, the cluster-level conditions are
//! inspected in fixed order: Invalid, Degraded, Progressing. Each condition
//! that is True contributes a human-readable block; the operator either gets
//! them all as a failure, or, with the override set, as one bundled warning.

use crate::cluster::ClusterVersionStatus;
use crate::conditions::ClusterConditionType;
use crate::error::UpgradeError;
use crate::resolve::UpgradeOptions;

/// Collect the blocks that argue against starting an update right now.
pub fn upgrade_blocks(status: &ClusterVersionStatus) -> Vec<String> {
    let checks = [
        (
            ClusterConditionType::Invalid,
            "the cluster version object is invalid, you must correct the invalid state first",
        ),
        (
            ClusterConditionType::Degraded,
            "the cluster is experiencing an update-blocking error",
        ),
        (ClusterConditionType::Progressing, "the cluster is already updating"),
    ];

    let mut blocks = Vec::new();
    for (condition_type, headline) in checks {
        if let Some(condition) = status.conditions.get(condition_type) {
            if condition.is_true() {
                blocks.push(format!("{headline}:\n\n{}", condition.reason_message_block()));
            }
        }
    }
    blocks
}

/// Enforce the gate: fail listing every block, or bypass with a bundled
/// warning when `allow_upgrade_with_warnings` is set.
pub fn enforce(
    status: &ClusterVersionStatus,
    options: &UpgradeOptions,
    warnings: &mut Vec<String>,
) -> Result<(), UpgradeError> {
    let blocks = upgrade_blocks(status);
    if blocks.is_empty() {
        return Ok(());
    }

    if !options.allow_upgrade_with_warnings {
        return Err(UpgradeError::Blocked { blocks });
    }

    warnings.push(format!(
        "--allow-upgrade-with-warnings is bypassing: {}",
        blocks.join("\n\n")
    ));
    Ok(())
}
