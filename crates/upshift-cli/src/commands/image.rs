//! Image command - request an update to a specific release image

use upshift_core::{Intent, UpgradeOptions};

use crate::commands::execute;
use crate::error::Result;

/// Run the image command
pub async fn run(
    pullspec: String,
    force: bool,
    allow_explicit_upgrade: bool,
    allow_not_recommended: bool,
    allow_upgrade_with_warnings: bool,
) -> Result<()> {
    let options = UpgradeOptions {
        force,
        allow_explicit_upgrade,
        allow_not_recommended,
        allow_upgrade_with_warnings,
        ..UpgradeOptions::default()
    };
    execute(Intent::ToImage(pullspec), options).await
}
