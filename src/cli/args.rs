use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the tsz-docs binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsz-docs",
    version,
    about = "Revive, merge and re-serialize tsz documentation projects"
)]
pub struct CliArgs {
    /// Options file (JSON) supplying defaults for the flags below.
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory that serialized file names are relative to.
    #[arg(long = "projectRoot", alias = "project-root", global = true)]
    pub project_root: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Revive serialized projects and write them back as JSON. Several inputs
    /// are merged into one project with a module per input.
    Revive(ReviveArgs),
    /// Revive a serialized project and print reflection counts by kind.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct ReviveArgs {
    /// Serialized project files.
    pub inputs: Vec<PathBuf>,

    /// Name of the revived project.
    #[arg(long)]
    pub name: Option<String>,

    /// Write JSON here instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Indent the written JSON.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Serialized project file.
    pub input: PathBuf,
}
