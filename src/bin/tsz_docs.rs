#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;

use tsz_docs::cli::args::{CliArgs, Command};
use tsz_docs::cli::config::TszDocsOptions;
use tsz_docs::cli::driver;

fn main() -> Result<()> {
    // Initialize tracing if TSZ_DOCS_LOG or RUST_LOG is set.
    tsz_docs::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let mut options = TszDocsOptions::from_args(&args)?;

    match &args.command {
        Command::Revive(revive) => {
            options.apply_revive_args(revive);
            let root = options.resolved_project_root(&cwd);
            let output = driver::run_revive(&options, &root)?;
            match &options.out {
                Some(path) => std::fs::write(path, &output.json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", output.json),
            }
            if !output.issues.is_empty() {
                eprintln!("{} issue(s) while reviving:", output.issues.len());
                for issue in &output.issues {
                    eprintln!("  {issue}");
                }
            }
        }
        Command::Check(check) => {
            let root = options.resolved_project_root(&cwd);
            print!("{}", driver::run_check(&check.input, &root)?);
        }
    }
    Ok(())
}
