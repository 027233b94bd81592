//! Upshift CLI - declarative cluster update management

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod exit_codes;

use error::Result;

#[derive(Parser)]
#[command(name = "upshift")]
#[command(author = "Upshift Contributors")]
#[command(version)]
#[command(about = "Manage the desired software version of a cluster", long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
struct Cli {
    /// Runs `status` when no subcommand is given
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

const LONG_ABOUT: &str = "\
Check on update status or move the cluster to a newer version.

With no subcommand the current version info is displayed, along with \
whether an update is in progress, whether any errors might prevent an \
update, and the updates that are recommended for this cluster. The \
recommendation list is periodically retrieved from the update server and \
cached on the cluster.

`upshift to VERSION` requests one of the recommended updates, or reports \
an error if no such version exists. The cluster then updates itself; the \
request here only sets the desired state.

If the desired image is not in the recommendation list, `upshift image` \
must be combined with --allow-explicit-upgrade for the request to proceed. \
If the cluster is already updating, or is reporting an error that blocks \
updates, --allow-upgrade-with-warnings is required. Both overrides skip \
safety checks; prefer recommended updates whenever one is available.";

#[derive(Subcommand)]
enum Commands {
    /// Show update status and the recommended updates
    Status {
        /// Also display updates which are not recommended for this cluster
        #[arg(long)]
        include_not_recommended: bool,
    },

    /// Request an update to an exact version from the update lists
    #[command(disable_version_flag = true)]
    To {
        /// The version to update to
        version: String,

        /// Skip cluster-side image verification and precondition checks
        #[arg(long)]
        force: bool,

        /// Accept a matching update the cluster recommends against
        #[arg(long)]
        allow_not_recommended: bool,

        /// Proceed even when cluster conditions block updates
        #[arg(long)]
        allow_upgrade_with_warnings: bool,
    },

    /// Request an update to a specific release image
    Image {
        /// The release image pull spec, preferably by digest
        pullspec: String,

        /// Skip cluster-side image verification and precondition checks
        #[arg(long)]
        force: bool,

        /// Accept an image that is not in the update lists
        #[arg(long)]
        allow_explicit_upgrade: bool,

        /// Accept a matching update the cluster recommends against
        #[arg(long)]
        allow_not_recommended: bool,

        /// Proceed even when cluster conditions block updates
        #[arg(long)]
        allow_upgrade_with_warnings: bool,
    },

    /// Request an update to the newest available version
    Latest {
        /// Skip cluster-side image verification and precondition checks
        #[arg(long)]
        force: bool,

        /// Proceed even when cluster conditions block updates
        #[arg(long)]
        allow_upgrade_with_warnings: bool,
    },

    /// Cancel a requested update that has not started
    Clear,
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    // Set debug level
    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => commands::status::run(false).await,

        Some(Commands::Status { include_not_recommended }) => {
            commands::status::run(include_not_recommended).await
        }

        Some(Commands::To {
            version,
            force,
            allow_not_recommended,
            allow_upgrade_with_warnings,
        }) => {
            commands::to::run(version, force, allow_not_recommended, allow_upgrade_with_warnings)
                .await
        }

        Some(Commands::Image {
            pullspec,
            force,
            allow_explicit_upgrade,
            allow_not_recommended,
            allow_upgrade_with_warnings,
        }) => {
            commands::image::run(
                pullspec,
                force,
                allow_explicit_upgrade,
                allow_not_recommended,
                allow_upgrade_with_warnings,
            )
            .await
        }

        Some(Commands::Latest { force, allow_upgrade_with_warnings }) => {
            commands::latest::run(force, allow_upgrade_with_warnings).await
        }

        Some(Commands::Clear) => commands::clear::run().await,
    }
}
