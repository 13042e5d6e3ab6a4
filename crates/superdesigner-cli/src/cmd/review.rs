use crate::cmd::{resolve_targets, ALL_TARGET, VERSION};
use crate::output::print_json;
use anyhow::{bail, Context};
use chrono::Utc;
use cursor_agent::{AgentError, AgentRunConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use superdesigner_core::artifact::ArtifactSet;
use superdesigner_core::comment::{generate_comments, render_comments};
use superdesigner_core::config::Config;
use superdesigner_core::project::Project;
use superdesigner_core::review::render_review;
use superdesigner_core::telemetry::{Event, Telemetry};
use superdesigner_core::{io, paths, prompts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    Off,
    /// Run the agent after generation; `None` uses the configured timeout.
    On { timeout_minutes: Option<u64> },
}

impl AgentMode {
    pub fn new(agent: bool, timeout_minutes: Option<u64>) -> Self {
        if agent {
            AgentMode::On { timeout_minutes }
        } else {
            AgentMode::Off
        }
    }
}

#[derive(Serialize)]
struct ReviewReport {
    slug: String,
    name: String,
    comments: usize,
    files: Vec<PathBuf>,
}

pub fn run(
    root: &Path,
    target: Option<&str>,
    agent: AgentMode,
    telemetry: &Telemetry,
    json: bool,
) -> anyhow::Result<()> {
    if agent != AgentMode::Off && target == Some(ALL_TARGET) {
        emit(
            json,
            "\n⚠️  --agent requires a single project slug, not \"all\".\n   \
             Example: superdesigner review my-project --agent\n\n",
        );
        bail!("--agent requires a single project slug");
    }

    // Sent before any async runtime exists; the telemetry client blocks.
    let event = match agent {
        AgentMode::Off => Event::Review,
        AgentMode::On { .. } => Event::ReviewAgent,
    };
    telemetry.track(event, VERSION);

    let slugs = resolve_targets(root, target)?;
    let mut reports = Vec::with_capacity(slugs.len());
    for slug in &slugs {
        let report = generate(root, slug).with_context(|| format!("failed to review {slug}"))?;
        if !json {
            print_generated(&report);
        }
        reports.push(report);
    }

    let AgentMode::On { timeout_minutes } = agent else {
        if json {
            return print_json(&reports);
        }
        let single = match slugs.as_slice() {
            [slug] => Some(slug.as_str()),
            _ => None,
        };
        print_manual_next_step(single);
        return Ok(());
    };

    let [slug] = slugs.as_slice() else {
        bail!("--agent requires a single project slug");
    };
    run_agent(root, slug, timeout_minutes, json)?;
    if json {
        print_json(&reports)?;
    }
    Ok(())
}

/// Write the review, the comment preview and the agent prompt files.
fn generate(root: &Path, slug: &str) -> anyhow::Result<ReviewReport> {
    let project = Project::open(root, slug)?;
    let artifacts = ArtifactSet::load(root, slug);
    let today = Utc::now().date_naive();

    let review_path = paths::design_review_path(root, slug);
    io::atomic_write(
        &review_path,
        render_review(&artifacts, &project.name, today).as_bytes(),
    )?;

    let comments = generate_comments(&artifacts);
    let comments_path = paths::comments_preview_path(root, slug);
    io::atomic_write(
        &comments_path,
        render_comments(&comments, &project.name, today).as_bytes(),
    )?;

    prompts::write_review_prompts(root, slug, &project.name, &artifacts, Utc::now())?;
    tracing::debug!(slug, comments = comments.len(), "review generated");

    Ok(ReviewReport {
        slug: slug.to_string(),
        name: project.name,
        comments: comments.len(),
        files: vec![
            review_path,
            comments_path,
            paths::review_prompt_path(root, slug),
            paths::review_context_path(root, slug),
        ],
    })
}

fn print_generated(report: &ReviewReport) {
    let slug = &report.slug;
    println!("✅ Review generated: {} ({slug})", report.name);
    println!("   projects/{slug}/{}/{}", paths::INSIGHTS_DIR, paths::DESIGN_REVIEW_FILE);
    println!(
        "   projects/{slug}/{}/{} ({} comments)",
        paths::INSIGHTS_DIR,
        paths::COMMENTS_PREVIEW_FILE,
        report.comments
    );
    println!(
        "   projects/{slug}/{}/{}/{}",
        paths::INSIGHTS_DIR,
        paths::PROMPTS_DIR,
        paths::REVIEW_PROMPT_FILE
    );
    println!();
}

fn print_manual_next_step(slug: Option<&str>) {
    println!("📝 Next step:");
    match slug {
        Some(slug) => println!("   Run: superdesigner review {slug} --agent"),
        None => println!("   Run: superdesigner review <project> --agent"),
    }
    println!();
    println!(
        "   Or manually: open {} in Cursor → Cmd+I → Agent mode",
        paths::REVIEW_PROMPT_FILE
    );
    println!();
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

fn run_agent(
    root: &Path,
    slug: &str,
    timeout_minutes: Option<u64>,
    quiet: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config.yaml")?;
    let prompt_path = paths::review_prompt_path(root, slug);
    let review_path = paths::design_review_path(root, slug);
    let timeout = timeout_minutes
        .map(|m| Duration::from_secs(m.saturating_mul(60)))
        .unwrap_or_else(|| config.agent.timeout());

    if !cursor_agent::is_available(&config.agent.executable) {
        emit(quiet, &missing_agent_banner(&prompt_path));
        return Ok(());
    }

    let run_config = AgentRunConfig::from_prompt_file(&prompt_path, paths::project_dir(root, slug))
        .with_context(|| format!("prompt file not found: {}", prompt_path.display()))?
        .executable(config.agent.executable.clone())
        .timeout(timeout);

    let before = modified(&review_path);
    if !quiet {
        println!("🤖 Running Cursor agent on {slug} (timeout {}m)", timeout.as_secs() / 60);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async {
        if quiet {
            cursor_agent::run_with_progress(run_config, |_| {}).await
        } else {
            cursor_agent::run(run_config).await
        }
    });

    match result {
        Ok(()) => {}
        Err(AgentError::NotInstalled(_)) => {
            emit(quiet, &missing_agent_banner(&prompt_path));
            return Ok(());
        }
        Err(AgentError::AuthRequired) => {
            emit(quiet, &auth_banner(&prompt_path, slug));
            bail!("Cursor agent requires authentication");
        }
        Err(e) => return Err(e).context("agent failed"),
    }

    if quiet {
        return Ok(());
    }
    println!();
    if modified(&review_path) != before {
        println!("✅ Review complete!");
        println!();
        println!("📝 Next steps:");
        println!("   1. View the design review in projects/{slug}/{}/", paths::INSIGHTS_DIR);
        println!("   2. Run: superdesigner comment {slug} --dry-run");
    } else {
        println!("⚠️  Agent completed but did not update {}.", paths::DESIGN_REVIEW_FILE);
        println!("   Try running again or check the prompt file manually.");
    }
    println!();
    Ok(())
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Banners go to stderr under `--json` so stdout stays a single document.
fn emit(quiet: bool, text: &str) {
    if quiet {
        eprint!("{text}");
    } else {
        print!("{text}");
    }
}

fn missing_agent_banner(prompt_path: &Path) -> String {
    format!(
        "
⚠️  Cursor Agent CLI not found.

To install:

  curl https://cursor.com/install -fsS | bash
  agent login

Or from Cursor:
  Cmd+Shift+P → \"Install 'agent' command\"

Manual workflow (without CLI):
  1. Open {prompt_file} in Cursor
  2. Select all (Cmd+A) → Cmd+I → Agent mode

Docs: https://cursor.com/docs/cli/headless

{location}",
        prompt_file = paths::REVIEW_PROMPT_FILE,
        location = prompt_location(prompt_path),
    )
}

fn auth_banner(prompt_path: &Path, slug: &str) -> String {
    format!(
        "
⚠️  Cursor Agent requires authentication.

Run this once to log in:

  agent login

Or set CURSOR_API_KEY for automation:
  export CURSOR_API_KEY=your_api_key_here

Docs: https://cursor.com/docs/cli/reference/authentication

{location}After logging in, run again:
   superdesigner review {slug} --agent

",
        location = prompt_location(prompt_path),
    )
}

fn prompt_location(prompt_path: &Path) -> String {
    format!("📄 Prompt file ready at:\n   {}\n\n", prompt_path.display())
}
