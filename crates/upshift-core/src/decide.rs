//! Decision orchestration
//!
//! One invocation is one decision: fetch the snapshot, resolve the intent,
//! gate the result, and submit at most one mutation computed from that same
//! snapshot. Warnings accumulate across the whole decision and survive a
//! failing outcome, so everything already disclosed still reaches the
//! operator.

use crate::client::{ClientError, ClusterVersionClient};
use crate::cluster::{ClusterVersion, Update};
use crate::error::UpgradeError;
use crate::gate;
use crate::report::render_status;
use crate::resolve::{self, Intent, Resolution, UpgradeOptions};

/// Terminal outcome of a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing needed to change.
    Noop(String),
    /// A mutation was submitted.
    Applied(String),
    /// Status report lines for stdout.
    Report(Vec<String>),
    /// The decision failed.
    Failure(UpgradeError),
}

/// A decision plus the warnings accumulated while making it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub warnings: Vec<String>,
    pub outcome: Outcome,
}

/// Make one decision for `intent` against the cluster behind `client`.
pub async fn decide<C>(client: &C, intent: &Intent, options: &UpgradeOptions) -> Decision
where
    C: ClusterVersionClient + ?Sized,
{
    let mut warnings = Vec::new();
    let outcome = match run(client, intent, options, &mut warnings).await {
        Ok(outcome) => outcome,
        Err(err) => Outcome::Failure(err),
    };
    Decision { warnings, outcome }
}

async fn run<C>(
    client: &C,
    intent: &Intent,
    options: &UpgradeOptions,
    warnings: &mut Vec<String>,
) -> Result<Outcome, UpgradeError>
where
    C: ClusterVersionClient + ?Sized,
{
    let cluster_version = client
        .fetch()
        .await
        .map_err(|err| wrap_client(err, "unable to fetch the cluster version"))?;

    match intent {
        Intent::StatusOnly => {
            let report = render_status(
                &cluster_version.spec,
                &cluster_version.status,
                options.include_not_recommended,
            )?;
            warnings.extend(report.warnings);
            Ok(Outcome::Report(report.lines))
        }

        Intent::Clear => {
            let Some(pending) = cluster_version.spec.desired_update.clone() else {
                return Ok(Outcome::Noop("No update in progress".to_string()));
            };
            let desired = client
                .clear_desired_update()
                .await
                .map_err(|err| wrap_client(err, "unable to cancel the requested update"))?;
            if pending.is_equivalent(&desired) {
                Ok(Outcome::Noop(format!(
                    "Cleared the update request, still at {}",
                    desired.display_name()
                )))
            } else {
                Ok(Outcome::Applied(format!(
                    "Cancelled the requested update to {}",
                    pending.display_name()
                )))
            }
        }

        Intent::ToLatest => {
            let resolution = resolve::resolve_latest(&cluster_version.status);
            apply_target(client, &cluster_version, resolution, options, warnings, true).await
        }

        Intent::ToVersion(version) => {
            let resolution =
                resolve::resolve_explicit(&cluster_version.status, version, "", options, warnings)?;
            apply_target(client, &cluster_version, resolution, options, warnings, false).await
        }

        Intent::ToImage(image) => {
            let resolution =
                resolve::resolve_explicit(&cluster_version.status, "", image, options, warnings)?;
            apply_target(client, &cluster_version, resolution, options, warnings, false).await
        }
    }
}

/// Gate a resolved target, build the update request, and submit it.
async fn apply_target<C>(
    client: &C,
    cluster_version: &ClusterVersion,
    resolution: Resolution,
    options: &UpgradeOptions,
    warnings: &mut Vec<String>,
    latest: bool,
) -> Result<Outcome, UpgradeError>
where
    C: ClusterVersionClient + ?Sized,
{
    let release = match resolution {
        Resolution::AlreadyAt { message } => return Ok(Outcome::Noop(message)),
        Resolution::Target(release) => release,
    };

    gate::enforce(&cluster_version.status, options, warnings)?;

    let update = Update::targeting(&release, options.force);
    if options.force {
        warnings.push(
            "--force overrides cluster verification of the requested release image and waives \
             any update precondition failures"
                .to_string(),
        );
    }

    let mut spec = cluster_version.spec.clone();
    spec.desired_update = Some(update.clone());

    let context = if latest {
        format!("unable to update to the latest version {}", update.display_name())
    } else {
        format!("unable to update to {}", update.display_name())
    };
    client
        .apply_spec(&spec)
        .await
        .map_err(|err| wrap_client(err, &context))?;

    let message = match (latest, update.version.is_empty()) {
        (true, false) => format!("Updating to latest version {}", update.version),
        (true, true) => format!("Updating to latest release image {}", update.image),
        (false, false) => format!("Updating to {}", update.version),
        (false, true) => format!("Updating to release image {}", update.image),
    };
    Ok(Outcome::Applied(message))
}

fn wrap_client(err: ClientError, context: &str) -> UpgradeError {
    match err {
        ClientError::NotFound => UpgradeError::NotConnected,
        ClientError::Api(message) => UpgradeError::Api {
            context: context.to_string(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::cluster::{
        ClusterVersionSpec, ClusterVersionStatus, ConditionalUpdate, Release,
    };
    use crate::conditions::{Condition, ConditionStatus};

    /// In-memory collaborator for exercising decisions without a cluster.
    struct MockClusterClient {
        fetch_result: Result<ClusterVersion, ClientError>,
        clear_result: Result<Release, ClientError>,
        apply_result: Result<(), ClientError>,
        applied: Mutex<Vec<ClusterVersionSpec>>,
        cleared: Mutex<usize>,
    }

    impl MockClusterClient {
        fn new(cluster_version: ClusterVersion) -> Self {
            Self {
                fetch_result: Ok(cluster_version),
                clear_result: Ok(Release::default()),
                apply_result: Ok(()),
                applied: Mutex::new(Vec::new()),
                cleared: Mutex::new(0),
            }
        }

        fn not_found() -> Self {
            Self {
                fetch_result: Err(ClientError::NotFound),
                clear_result: Ok(Release::default()),
                apply_result: Ok(()),
                applied: Mutex::new(Vec::new()),
                cleared: Mutex::new(0),
            }
        }

        fn with_desired_after_clear(mut self, release: Release) -> Self {
            self.clear_result = Ok(release);
            self
        }

        fn with_failing_writes(mut self) -> Self {
            self.apply_result = Err(ClientError::Api("write refused".to_string()));
            self.clear_result = Err(ClientError::Api("write refused".to_string()));
            self
        }

        fn applied(&self) -> Vec<ClusterVersionSpec> {
            self.applied.lock().unwrap().clone()
        }

        fn cleared(&self) -> usize {
            *self.cleared.lock().unwrap()
        }
    }

    #[async_trait]
    impl ClusterVersionClient for MockClusterClient {
        async fn fetch(&self) -> Result<ClusterVersion, ClientError> {
            self.fetch_result.clone()
        }

        async fn clear_desired_update(&self) -> Result<Release, ClientError> {
            let desired = self.clear_result.clone()?;
            *self.cleared.lock().unwrap() += 1;
            Ok(desired)
        }

        async fn apply_spec(&self, spec: &ClusterVersionSpec) -> Result<(), ClientError> {
            self.apply_result.clone()?;
            self.applied.lock().unwrap().push(spec.clone());
            Ok(())
        }
    }

    fn release(version: &str, image: &str) -> Release {
        Release {
            version: version.to_string(),
            image: image.to_string(),
            channels: Vec::new(),
        }
    }

    fn condition(condition_type: &str, status: ConditionStatus) -> Condition {
        Condition {
            condition_type: condition_type.to_string(),
            status,
            reason: format!("{condition_type}Reason"),
            message: format!("{condition_type} details"),
            last_transition_time: None,
        }
    }

    fn cluster_version(available: Vec<Release>) -> ClusterVersion {
        ClusterVersion {
            spec: ClusterVersionSpec {
                desired_update: None,
                channel: "stable-4.3".to_string(),
                upstream: String::new(),
            },
            status: ClusterVersionStatus {
                desired: release("4.1.0", "quay.io/org/release:4.1.0"),
                available_updates: available,
                conditional_updates: Vec::new(),
                conditions: Default::default(),
            },
        }
    }

    #[tokio::test]
    async fn test_clear_with_nothing_pending_is_a_noop() {
        let client = MockClusterClient::new(cluster_version(Vec::new()));
        let decision = decide(&client, &Intent::Clear, &UpgradeOptions::default()).await;

        assert_eq!(decision.outcome, Outcome::Noop("No update in progress".to_string()));
        assert_eq!(client.cleared(), 0);
    }

    #[tokio::test]
    async fn test_clear_reports_still_at_when_equivalent() {
        let mut snapshot = cluster_version(Vec::new());
        snapshot.spec.desired_update = Some(Update {
            version: "4.1.0".to_string(),
            image: String::new(),
            force: false,
        });
        let client = MockClusterClient::new(snapshot)
            .with_desired_after_clear(release("4.1.0", "quay.io/org/release:4.1.0"));

        let decision = decide(&client, &Intent::Clear, &UpgradeOptions::default()).await;
        assert_eq!(
            decision.outcome,
            Outcome::Noop("Cleared the update request, still at 4.1.0".to_string())
        );
        assert_eq!(client.cleared(), 1);
    }

    #[tokio::test]
    async fn test_clear_reports_cancelled_when_not_equivalent() {
        let mut snapshot = cluster_version(Vec::new());
        snapshot.spec.desired_update = Some(Update {
            version: "4.2.0".to_string(),
            image: String::new(),
            force: false,
        });
        let client = MockClusterClient::new(snapshot)
            .with_desired_after_clear(release("4.1.0", "quay.io/org/release:4.1.0"));

        let decision = decide(&client, &Intent::Clear, &UpgradeOptions::default()).await;
        assert_eq!(
            decision.outcome,
            Outcome::Applied("Cancelled the requested update to 4.2.0".to_string())
        );
    }

    #[tokio::test]
    async fn test_latest_applies_the_newest_update() {
        let client = MockClusterClient::new(cluster_version(vec![
            release("4.2.0", "quay.io/org/release:4.2.0"),
            release("4.3.0", "quay.io/org/release:4.3.0"),
        ]));

        let decision = decide(&client, &Intent::ToLatest, &UpgradeOptions::default()).await;
        assert_eq!(
            decision.outcome,
            Outcome::Applied("Updating to latest version 4.3.0".to_string())
        );

        let applied = client.applied();
        assert_eq!(applied.len(), 1);
        let update = applied[0].desired_update.as_ref().unwrap();
        assert_eq!(update.version, "4.3.0");
        assert!(!update.force);
        // The rest of the spec rides along untouched.
        assert_eq!(applied[0].channel, "stable-4.3");
    }

    #[tokio::test]
    async fn test_latest_with_no_updates_is_a_noop() {
        let client = MockClusterClient::new(cluster_version(Vec::new()));
        let decision = decide(&client, &Intent::ToLatest, &UpgradeOptions::default()).await;

        assert!(matches!(decision.outcome, Outcome::Noop(message) if message.contains("4.1.0")));
        assert!(client.applied().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_already_at_version_is_a_noop() {
        let client = MockClusterClient::new(cluster_version(vec![release("4.3.0", "")]));
        let decision = decide(
            &client,
            &Intent::ToVersion("4.1.0".to_string()),
            &UpgradeOptions::default(),
        )
        .await;

        assert_eq!(
            decision.outcome,
            Outcome::Noop("The cluster is already at version 4.1.0".to_string())
        );
        assert!(client.applied().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_version_applies() {
        let client = MockClusterClient::new(cluster_version(vec![
            release("4.2.0", "quay.io/org/release:4.2.0"),
            release("4.3.0", "quay.io/org/release:4.3.0"),
        ]));

        let decision = decide(
            &client,
            &Intent::ToVersion("4.3.0".to_string()),
            &UpgradeOptions::default(),
        )
        .await;
        assert_eq!(decision.outcome, Outcome::Applied("Updating to 4.3.0".to_string()));
        assert!(decision.warnings.is_empty());
    }

    fn with_not_recommended(mut snapshot: ClusterVersion) -> ClusterVersion {
        snapshot.status.conditional_updates = vec![ConditionalUpdate {
            release: release("4.3.1", "quay.io/org/release:4.3.1"),
            conditions: vec![Condition {
                condition_type: "Recommended".to_string(),
                status: ConditionStatus::False,
                reason: "BuggyDriver".to_string(),
                message: "known driver bug".to_string(),
                last_transition_time: None,
            }]
            .into(),
        }];
        snapshot
    }

    #[tokio::test]
    async fn test_not_recommended_fails_without_the_flag() {
        let client =
            MockClusterClient::new(with_not_recommended(cluster_version(vec![release("4.2.0", "")])));
        let decision = decide(
            &client,
            &Intent::ToVersion("4.3.1".to_string()),
            &UpgradeOptions::default(),
        )
        .await;

        match decision.outcome {
            Outcome::Failure(UpgradeError::NotRecommended { reason, message, .. }) => {
                assert_eq!(reason, "BuggyDriver");
                assert_eq!(message, "known driver bug");
            }
            other => panic!("expected a NotRecommended failure, got {other:?}"),
        }
        assert!(client.applied().is_empty());
    }

    #[tokio::test]
    async fn test_not_recommended_applies_with_bypass_warning() {
        let client =
            MockClusterClient::new(with_not_recommended(cluster_version(vec![release("4.2.0", "")])));
        let options = UpgradeOptions {
            allow_not_recommended: true,
            ..UpgradeOptions::default()
        };
        let decision = decide(&client, &Intent::ToVersion("4.3.1".to_string()), &options).await;

        assert_eq!(decision.outcome, Outcome::Applied("Updating to 4.3.1".to_string()));
        assert!(decision.warnings.iter().any(|w| w.contains("accepted the risks")));
        assert_eq!(client.applied().len(), 1);
    }

    fn degraded(mut snapshot: ClusterVersion) -> ClusterVersion {
        snapshot
            .status
            .conditions
            .insert(condition("Degraded", ConditionStatus::True));
        snapshot
    }

    #[tokio::test]
    async fn test_degraded_cluster_blocks_latest() {
        let client = MockClusterClient::new(degraded(cluster_version(vec![release("4.3.0", "")])));
        let decision = decide(&client, &Intent::ToLatest, &UpgradeOptions::default()).await;

        match decision.outcome {
            Outcome::Failure(UpgradeError::Blocked { blocks }) => {
                assert_eq!(blocks.len(), 1);
                assert!(blocks[0].contains("Reason: DegradedReason"));
            }
            other => panic!("expected a Blocked failure, got {other:?}"),
        }
        assert!(client.applied().is_empty());
    }

    #[tokio::test]
    async fn test_degraded_cluster_applies_with_override() {
        let client = MockClusterClient::new(degraded(cluster_version(vec![release("4.3.0", "")])));
        let options = UpgradeOptions {
            allow_upgrade_with_warnings: true,
            ..UpgradeOptions::default()
        };
        let decision = decide(&client, &Intent::ToLatest, &options).await;

        assert_eq!(
            decision.outcome,
            Outcome::Applied("Updating to latest version 4.3.0".to_string())
        );
        assert!(decision.warnings.iter().any(|w| w.contains("Degraded details")));
    }

    #[tokio::test]
    async fn test_force_and_bypass_warnings_are_independent() {
        let client = MockClusterClient::new(degraded(with_not_recommended(cluster_version(
            vec![release("4.2.0", "")],
        ))));
        let options = UpgradeOptions {
            force: true,
            allow_not_recommended: true,
            allow_upgrade_with_warnings: true,
            ..UpgradeOptions::default()
        };
        let decision = decide(&client, &Intent::ToVersion("4.3.1".to_string()), &options).await;

        assert!(matches!(decision.outcome, Outcome::Applied(_)));
        assert!(decision.warnings.iter().any(|w| w.contains("accepted the risks")));
        assert!(decision.warnings.iter().any(|w| w.contains("--allow-upgrade-with-warnings")));
        assert!(decision.warnings.iter().any(|w| w.contains("--force overrides")));

        let update = client.applied()[0].desired_update.clone().unwrap();
        assert!(update.force);
    }

    #[tokio::test]
    async fn test_warnings_survive_a_failing_gate() {
        // The bypass warning was already earned before the gate failed.
        let client = MockClusterClient::new(degraded(with_not_recommended(cluster_version(
            vec![release("4.2.0", "")],
        ))));
        let options = UpgradeOptions {
            allow_not_recommended: true,
            ..UpgradeOptions::default()
        };
        let decision = decide(&client, &Intent::ToVersion("4.3.1".to_string()), &options).await;

        assert!(matches!(decision.outcome, Outcome::Failure(UpgradeError::Blocked { .. })));
        assert!(decision.warnings.iter().any(|w| w.contains("accepted the risks")));
        assert!(client.applied().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_image_applies_as_release_image() {
        let snapshot = cluster_version(vec![release(
            "4.3.0",
            "quay.io/org/release:4.3.0@sha256:abc",
        )]);
        let client = MockClusterClient::new(snapshot);
        let decision = decide(
            &client,
            &Intent::ToImage("example.com/mirror/release:x@sha256:abc".to_string()),
            &UpgradeOptions::default(),
        )
        .await;

        // Digest equality matched the recommended update, so its version is
        // carried into the request.
        assert_eq!(decision.outcome, Outcome::Applied("Updating to 4.3.0".to_string()));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_connected() {
        let client = MockClusterClient::not_found();
        let decision = decide(&client, &Intent::StatusOnly, &UpgradeOptions::default()).await;
        assert_eq!(decision.outcome, Outcome::Failure(UpgradeError::NotConnected));
    }

    #[tokio::test]
    async fn test_write_failure_is_wrapped_and_fatal() {
        let client =
            MockClusterClient::new(cluster_version(vec![release("4.3.0", "")])).with_failing_writes();
        let decision = decide(&client, &Intent::ToLatest, &UpgradeOptions::default()).await;

        match decision.outcome {
            Outcome::Failure(UpgradeError::Api { context, message }) => {
                assert!(context.contains("latest version 4.3.0"));
                assert_eq!(message, "write refused");
            }
            other => panic!("expected an Api failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_status_only_reports_without_mutating() {
        let client = MockClusterClient::new(cluster_version(vec![release("4.2.3", "")]));
        let decision = decide(&client, &Intent::StatusOnly, &UpgradeOptions::default()).await;

        match decision.outcome {
            Outcome::Report(lines) => {
                assert!(lines.iter().any(|l| l.contains("Recommended updates:")));
            }
            other => panic!("expected a report, got {other:?}"),
        }
        assert!(client.applied().is_empty());
        assert_eq!(client.cleared(), 0);
    }
}
