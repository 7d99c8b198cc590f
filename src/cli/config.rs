use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use super::args::{CliArgs, ReviveArgs};
use crate::common::NormalizedPath;

/// Accepts `true`/`false` as well as their string spellings, so that
/// `"pretty": "true"` behaves like `"pretty": true`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// Options of a revive run, read from a JSON options file and overridden by
/// command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TszDocsOptions {
    /// Project name; defaults to the serialized name (single input) or
    /// [`DEFAULT_MERGED_NAME`] (several inputs).
    pub name: Option<String>,
    pub project_root: Option<String>,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub pretty: Option<bool>,
    /// Serialized projects to revive.
    pub inputs: Vec<PathBuf>,
    pub out: Option<PathBuf>,
}

/// Name given to a project merged from several inputs when none is set.
pub const DEFAULT_MERGED_NAME: &str = "Documentation";

pub fn parse_options(source: &str) -> Result<TszDocsOptions> {
    serde_json::from_str(source).context("failed to parse tsz-docs options JSON")
}

/// Read an options file. Relative `inputs`, `out` and `projectRoot` are
/// resolved against the file's directory.
pub fn load_options(path: &Path) -> Result<TszDocsOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options: {}", path.display()))?;
    let mut options =
        parse_options(&source).with_context(|| format!("failed to parse options: {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for input in &mut options.inputs {
        *input = base.join(&*input);
    }
    if let Some(out) = options.out.as_mut() {
        *out = base.join(&*out);
    }
    if let Some(root) = options.project_root.as_mut() {
        *root = base.join(&*root).to_string_lossy().into_owned();
    }
    Ok(options)
}

impl TszDocsOptions {
    /// Options for `args`: the `--config` file if given, with flags on top.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let mut options = match &args.config {
            Some(path) => load_options(path)?,
            None => Self::default(),
        };
        if let Some(root) = &args.project_root {
            options.project_root = Some(root.clone());
        }
        Ok(options)
    }

    /// Apply `revive` flags. Inputs given on the command line replace the
    /// configured ones.
    pub fn apply_revive_args(&mut self, args: &ReviveArgs) {
        if !args.inputs.is_empty() {
            self.inputs = args.inputs.clone();
        }
        if let Some(name) = &args.name {
            self.name = Some(name.clone());
        }
        if let Some(out) = &args.out {
            self.out = Some(out.clone());
        }
        if args.pretty {
            self.pretty = Some(true);
        }
    }

    /// Absolute, normalized project root; `cwd` when unset.
    pub fn resolved_project_root(&self, cwd: &Path) -> String {
        let cwd = cwd.to_string_lossy();
        match &self.project_root {
            Some(root) => NormalizedPath::resolve(&cwd, root).as_str().to_string(),
            None => NormalizedPath::new(&cwd).as_str().to_string(),
        }
    }
}
