//! Status report rendering
//!
//! Builds the status-only output as plain lines so the CLI owns styling and
//! stream routing: report lines go to stdout, warnings to stderr.

use crate::cluster::{ClusterVersionSpec, ClusterVersionStatus, Release};
use crate::conditions::{ClusterConditionType, RECOMMENDED};
use crate::error::UpgradeError;
use crate::version::{sort_conditional_updates, sort_releases};

// Matches the narrowest VERSION column the table will render.
const MIN_COLUMN_WIDTH: usize = 14;

/// Rendered status output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusReport {
    /// Ordered report lines for stdout.
    pub lines: Vec<String>,
    /// Diagnostics for stderr.
    pub warnings: Vec<String>,
}

/// Render the status-only report.
///
/// A Degraded=True condition is a terminal failure, not a report; the
/// Progressing message becomes its prefix when one is available.
pub fn render_status(
    spec: &ClusterVersionSpec,
    status: &ClusterVersionStatus,
    include_not_recommended: bool,
) -> Result<StatusReport, UpgradeError> {
    if let Some(degraded) = status.conditions.get(ClusterConditionType::Degraded) {
        if degraded.is_true() {
            let mut prefix = "No update is possible due to an error".to_string();
            if let Some(progressing) = status.conditions.get(ClusterConditionType::Progressing) {
                if progressing.is_true() && !progressing.message.is_empty() {
                    prefix = progressing.message.clone();
                }
            }
            if degraded.message.is_empty() {
                return Err(UpgradeError::ClusterNotUpgradeable);
            }
            return Err(UpgradeError::ClusterDegraded {
                prefix,
                block: degraded.reason_message_block(),
            });
        }
    }

    let mut report = StatusReport::default();

    match status.conditions.get(ClusterConditionType::Progressing) {
        Some(progressing) if !progressing.message.is_empty() => {
            if progressing.is_true() {
                report
                    .lines
                    .push(format!("info: An update is in progress. {}", progressing.message));
            } else {
                report.lines.push(progressing.message.clone());
            }
        }
        _ => report
            .warnings
            .push("No current status info, inspect the cluster version resource for more detail".to_string()),
    }
    report.lines.push(String::new());

    if let Some(upgradeable) = status.conditions.get(ClusterConditionType::Upgradeable) {
        if upgradeable.is_false() {
            report.lines.push(format!(
                "Upgradeable=False\n\n{}\n",
                upgradeable.reason_message_block()
            ));
        }
    }

    if !spec.channel.is_empty() {
        if spec.upstream.is_empty() {
            report
                .lines
                .push("Upstream is unset, so the cluster will use an appropriate default.".to_string());
        } else {
            report.lines.push(format!("Upstream: {}", spec.upstream));
        }
        if status.desired.channels.is_empty() {
            report.lines.push(format!("Channel: {}", spec.channel));
        } else {
            report.lines.push(format!(
                "Channel: {} (available channels: {})",
                spec.channel,
                status.desired.channels.join(", ")
            ));
        }
    }

    if !status.available_updates.is_empty() {
        report.lines.push(String::new());
        report.lines.push("Recommended updates:".to_string());
        report.lines.push(String::new());

        let mut updates = status.available_updates.clone();
        sort_releases(&mut updates);
        report.lines.extend(render_update_table(&updates));

        if let Some(retrieved) = status.conditions.get(ClusterConditionType::RetrievedUpdates) {
            if retrieved.is_false() {
                report.warnings.push(format!(
                    "Cannot refresh available updates:\n{}",
                    retrieved.reason_message_block()
                ));
            }
        }
    } else if let Some(retrieved) = status
        .conditions
        .get(ClusterConditionType::RetrievedUpdates)
        .filter(|condition| condition.is_false())
    {
        report.warnings.push(format!(
            "Cannot display available updates:\n{}",
            retrieved.reason_message_block()
        ));
    } else {
        report.lines.push(
            "No updates available. You may still request an update to a specific release image, \
             but doing so may not be supported and may result in downtime or data loss."
                .to_string(),
        );
    }

    render_conditional_updates(&mut report, status, include_not_recommended);

    Ok(report)
}

fn render_update_table(updates: &[Release]) -> Vec<String> {
    let width = updates
        .iter()
        .map(|update| update.version.len())
        .chain(std::iter::once("VERSION".len()))
        .max()
        .unwrap_or(0)
        .max(MIN_COLUMN_WIDTH);

    let mut lines = vec![format!("  {:<width$} {}", "VERSION", "IMAGE")];
    for update in updates {
        lines.push(format!("  {:<width$} {}", update.version, update.image));
    }
    lines
}

fn render_conditional_updates(
    report: &mut StatusReport,
    status: &ClusterVersionStatus,
    include_not_recommended: bool,
) {
    let is_not_recommended = |update: &crate::cluster::ConditionalUpdate| {
        matches!(update.conditions.find(RECOMMENDED), Some(c) if !c.is_true())
    };
    let has_not_recommended = status.conditional_updates.iter().any(is_not_recommended);

    if !include_not_recommended {
        if has_not_recommended {
            report.lines.push(String::new());
            report.lines.push(
                "Additional updates which are not recommended based on your cluster configuration \
                 are available, to view those re-run the command with --include-not-recommended."
                    .to_string(),
            );
        }
        return;
    }

    if !has_not_recommended {
        report.lines.push(String::new());
        report.lines.push(
            "No updates which are not recommended based on your cluster configuration are available."
                .to_string(),
        );
        return;
    }

    let mut conditional = status.conditional_updates.clone();
    sort_conditional_updates(&mut conditional);

    report.lines.push(String::new());
    report.lines.push("Supported but not recommended updates:".to_string());
    for update in &conditional {
        let Some(condition) = update.conditions.find(RECOMMENDED) else {
            continue;
        };
        if condition.is_true() {
            continue;
        }
        report.lines.push(String::new());
        report.lines.push(format!("  Version: {}", update.release.version));
        report.lines.push(format!("  Image: {}", update.release.image));
        report.lines.push(format!("  Recommended: {}", condition.status));
        report.lines.push(format!("  Reason: {}", condition.reason));
        report.lines.push(format!(
            "  Message: {}",
            condition.message.trim().replace('\n', "\n  ")
        ));
    }
}
