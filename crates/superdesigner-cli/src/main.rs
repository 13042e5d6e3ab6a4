mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use superdesigner_core::config::Config;
use superdesigner_core::telemetry::Telemetry;

#[derive(Parser)]
#[command(
    name = "superdesigner",
    about = "A lean design review workflow: scaffold projects, generate reviews, post Figma comments",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from projects/ or .superdesigner/)
    #[arg(long, global = true, env = "SUPERDESIGNER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Do not send anonymous usage events
    #[arg(long, global = true)]
    no_telemetry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project with artifact templates
    #[command(visible_alias = "new")]
    Init {
        /// Project display name (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// List projects in the workspace
    List,

    /// Extract raw slides and notes into an agent conversion prompt
    Convert {
        /// Project slug, or `all` (omit when there is a single project)
        target: Option<String>,
    },

    /// Generate the design review, comment preview and agent prompts
    Review {
        /// Project slug, or `all` (omit when there is a single project)
        target: Option<String>,

        /// Run the Cursor agent on the generated prompt
        #[arg(long)]
        agent: bool,

        /// Agent timeout in minutes (default: agent.timeout_minutes from config)
        #[arg(long, value_name = "MIN", requires = "agent")]
        agent_timeout: Option<u64>,
    },

    /// Post the previewed comments to Figma
    Comment {
        /// Project slug (omit when there is a single project)
        slug: Option<String>,

        /// Print the comments without posting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Check the workspace and tooling
    Doctor {
        /// Repair fixable problems
        #[arg(long)]
        fix: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved workspace root");

    let telemetry = match Config::load(&root) {
        Ok(cfg) => Telemetry::new(&cfg.telemetry, cli.no_telemetry),
        Err(_) => Telemetry::disabled(),
    };

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, &name.join(" "), &telemetry, cli.json),
        Commands::List => cmd::list::run(&root, cli.json),
        Commands::Convert { target } => cmd::convert::run(&root, target.as_deref(), cli.json),
        Commands::Review {
            target,
            agent,
            agent_timeout,
        } => cmd::review::run(
            &root,
            target.as_deref(),
            cmd::review::AgentMode::new(agent, agent_timeout),
            &telemetry,
            cli.json,
        ),
        Commands::Comment { slug, dry_run } => {
            cmd::comment::run(&root, slug.as_deref(), dry_run, cli.json)
        }
        Commands::Doctor { fix } => cmd::doctor::run(&root, fix, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
