use crate::output::{print_json, print_table};
use serde::Serialize;
use std::path::Path;
use superdesigner_core::project::{self, Project};
use superdesigner_core::paths;

#[derive(Serialize)]
struct ProjectRow {
    slug: String,
    name: String,
    reviewed: bool,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    for slug in project::list(root)? {
        let project = Project::open(root, &slug)?;
        rows.push(ProjectRow {
            reviewed: paths::design_review_path(root, &slug).is_file(),
            slug,
            name: project.name,
        });
    }

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No projects. Create one with: superdesigner init \"My Project\"");
        return Ok(());
    }

    let table: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| {
            vec![
                r.slug,
                r.name,
                if r.reviewed { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["SLUG", "NAME", "REVIEWED"], &table);
    Ok(())
}
