use crate::cmd::VERSION;
use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use superdesigner_core::artifact::ArtifactKind;
use superdesigner_core::config::Config;
use superdesigner_core::project::Project;
use superdesigner_core::telemetry::{Event, Telemetry};
use superdesigner_core::{io, paths};

#[derive(Serialize)]
struct InitReport<'a> {
    name: &'a str,
    slug: &'a str,
    path: &'a Path,
    config_created: bool,
}

pub fn run(root: &Path, name: &str, telemetry: &Telemetry, json: bool) -> anyhow::Result<()> {
    telemetry.track(Event::Init, VERSION);

    let projects = paths::projects_dir(root);
    io::ensure_dir(&projects).with_context(|| format!("failed to create {}", projects.display()))?;

    let project = Project::create(root, name, Utc::now())?;
    let config_created = Config::ensure(root).context("failed to write config.yaml")?;

    if json {
        return print_json(&InitReport {
            name: &project.name,
            slug: &project.slug,
            path: &project.path,
            config_created,
        });
    }

    println!("Created project: {}", project.name);
    println!("  projects/{}/", project.slug);
    for &kind in ArtifactKind::all() {
        println!(
            "    {}/{:<14} {}",
            paths::CONTEXT_DIR,
            kind.filename(),
            kind.description()
        );
    }
    println!("    {}/                   drop slides, notes and exports here", paths::RAW_DIR);
    println!("    {}/", paths::INSIGHTS_DIR);
    if config_created {
        println!("  created: {}", paths::CONFIG_FILE);
    }
    println!();
    println!("Next steps:");
    println!("  1. Fill in projects/{}/context/prd.md", project.slug);
    println!("  2. Add the Figma link to projects/{}/context/figma.md", project.slug);
    println!("  3. Run: superdesigner review {}", project.slug);
    Ok(())
}
