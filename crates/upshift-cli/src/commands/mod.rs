//! CLI commands

pub mod clear;
pub mod image;
pub mod latest;
pub mod status;
pub mod to;

use console::style;

use upshift_core::{Intent, Outcome, UpgradeOptions, decide, validate_intent};
use upshift_kube::ClusterClient;

use crate::error::{CliError, Result};

/// Validate, connect, decide, and print one decision.
pub(crate) async fn execute(intent: Intent, options: UpgradeOptions) -> Result<()> {
    // Input validation happens before any cluster access.
    let warnings = validate_intent(&intent, &options).map_err(CliError::from)?;
    print_warnings(&warnings);

    let client = ClusterClient::try_default()
        .await
        .map_err(|err| CliError::connect(err.to_string()))?;

    let decision = decide(&client, &intent, &options).await;
    print_warnings(&decision.warnings);

    match decision.outcome {
        Outcome::Noop(message) => {
            println!("{} {}", style("info:").blue().bold(), message);
            Ok(())
        }
        Outcome::Applied(message) => {
            println!("{} {}", style("✓").green().bold(), message);
            Ok(())
        }
        Outcome::Report(lines) => {
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
        Outcome::Failure(err) => Err(CliError::from(err)),
    }
}

/// Warnings go to stderr so report output stays parseable.
fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{} {}", style("warning:").yellow().bold(), warning);
    }
}
