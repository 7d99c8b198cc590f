use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info_span};

use super::config::{DEFAULT_MERGED_NAME, TszDocsOptions};
use crate::{DeserializeIssue, Deserializer, ProjectReflection, ReflectionKind, Serializer};

/// Result of a revive run.
#[derive(Debug)]
pub struct ReviveOutput {
    pub json: String,
    pub reflection_count: usize,
    pub issues: Vec<DeserializeIssue>,
}

pub fn read_project_json(path: &Path) -> Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read serialized project: {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Revive `values` into one project: a single input keeps its shape, several
/// are merged with a module per input.
pub fn revive_values(
    deserializer: &Deserializer,
    values: &[Value],
    name: Option<&str>,
    project_root: &str,
) -> Result<ProjectReflection> {
    let project = match values {
        [] => bail!("no serialized projects given"),
        [single] => deserializer.revive_project(single, name, project_root)?,
        many => deserializer.revive_projects(name.unwrap_or(DEFAULT_MERGED_NAME), many, project_root)?,
    };
    Ok(project)
}

/// Read, revive and re-serialize the configured inputs.
pub fn run_revive(options: &TszDocsOptions, project_root: &str) -> Result<ReviveOutput> {
    let _span = info_span!("revive", inputs = options.inputs.len()).entered();

    let values = options
        .inputs
        .iter()
        .map(|path| read_project_json(path))
        .collect::<Result<Vec<_>>>()?;

    let deserializer = Deserializer::new();
    let project = revive_values(&deserializer, &values, options.name.as_deref(), project_root)?;
    let json = Serializer::new()
        .project_to_string(&project, project_root, options.pretty.unwrap_or(false))
        .context("failed to serialize revived project")?;
    debug!(bytes = json.len(), "revived project serialized");

    Ok(ReviveOutput {
        json,
        reflection_count: project.reflection_count(),
        issues: deserializer.take_issues(),
    })
}

/// Reflection counts by primary kind, in kind order. Kinds with no
/// reflections are left out.
pub fn kind_counts(project: &ProjectReflection) -> Vec<(ReflectionKind, usize)> {
    let reflections = project.reflections();
    ReflectionKind::primary_kinds()
        .map(|kind| (kind, reflections.iter().filter(|r| r.kind == kind).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Human-readable summary printed by `tsz-docs check`.
pub fn format_check_report(project: &ProjectReflection, issues: &[DeserializeIssue]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {} reflections", project.name(), project.reflection_count());
    for (kind, count) in kind_counts(project) {
        let label = if count == 1 {
            kind.singular_name()
        } else {
            kind.plural_name()
        };
        let _ = writeln!(out, "  {count:>5} {label}");
    }
    if !issues.is_empty() {
        let _ = writeln!(out, "{} issue(s):", issues.len());
        for issue in issues {
            let _ = writeln!(out, "  {issue}");
        }
    }
    out
}

/// Revive `path` and summarize it.
pub fn run_check(path: &Path, project_root: &str) -> Result<String> {
    let value = read_project_json(path)?;
    let deserializer = Deserializer::new();
    let project = deserializer
        .revive_project(&value, None, project_root)
        .with_context(|| format!("failed to revive {}", path.display()))?;
    Ok(format_check_report(&project, &deserializer.take_issues()))
}
