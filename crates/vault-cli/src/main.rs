mod cmd;
mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vault-agent",
    about = "Capture coding-session state into a markdown vault — status, daily logs, dashboard, rollups",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file to ~/.config/vault-agent/config.yaml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Process a session log: extract state, update STATUS, daily log, and dashboard
    Sync {
        /// Process a specific session by id
        #[arg(long, short = 's', conflicts_with_all = ["project", "all"])]
        session: Option<String>,

        /// Process the most recent session for a project path
        #[arg(long, short = 'p', conflicts_with = "all")]
        project: Option<String>,

        /// Update all recently active projects (best-effort)
        #[arg(long)]
        all: bool,

        /// Daily log date (YYYY-MM-DD, default: session date or today)
        #[arg(long)]
        date: Option<String>,

        /// Preview the extraction without writing to the vault
        #[arg(long, short = 'n')]
        dry_run: bool,
    },

    /// Regenerate weekly rollups from daily logs
    Weekly {
        /// Project name (default: all projects with daily logs)
        #[arg(long)]
        project: Option<String>,

        /// ISO week key like 2026-W06 (default: current week)
        #[arg(long)]
        week: Option<String>,
    },

    /// Regenerate monthly rollups from daily logs
    Monthly {
        /// Project name (default: all projects with daily logs)
        #[arg(long)]
        project: Option<String>,

        /// Month key like 2026-02 (default: current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Regenerate DASHBOARD.md from the projects' STATUS documents
    Dashboard,

    /// Print a cross-project standup: recent completed work, today's next
    /// steps, and current blockers
    Standup {
        /// Single project only (default: all projects)
        #[arg(long, short = 'p')]
        project: Option<String>,

        /// How many days of completed items to include
        #[arg(long, default_value_t = 1, conflicts_with = "week")]
        days: u32,

        /// Cover the last 7 days
        #[arg(long)]
        week: bool,
    },

    /// Show a project's current status from its STATUS.md
    Status { project: String },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Init { force } => cmd::init::run(force),
        Commands::Sync {
            session,
            project,
            all,
            date,
            dry_run,
        } => cmd::sync::run(session.as_deref(), project.as_deref(), all, date.as_deref(), dry_run),
        Commands::Weekly { project, week } => {
            cmd::rollup::run_weekly(project.as_deref(), week.as_deref())
        }
        Commands::Monthly { project, month } => {
            cmd::rollup::run_monthly(project.as_deref(), month.as_deref())
        }
        Commands::Dashboard => cmd::dashboard::run(),
        Commands::Standup {
            project,
            days,
            week,
        } => cmd::standup::run(project.as_deref(), days, week, cli.json),
        Commands::Status { project } => cmd::status::run(&project, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
