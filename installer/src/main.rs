//! Gantry installer CLI entrypoint.
//!
//! This binary fetches, verifies, and atomically installs the artifacts a
//! TOML manifest declares. On success it can report the installed set as
//! JSON; on any failure the install target is left untouched.

use camino::Utf8PathBuf;
use clap::Parser;
use gantry_installer::cli::{Cli, Command, InstallArgs, ListArgs};
use gantry_installer::dirs::{SystemBaseDirs, default_target_dir};
use gantry_installer::error::{InstallError, Result};
use gantry_installer::fetch::HttpFetcher;
use gantry_installer::install::{InstalledSet, install};
use gantry_installer::list::{render_json, render_text};
use gantry_installer::lock::TargetLock;
use gantry_installer::manifest::Manifest;
use gantry_installer::output::{success_message, write_stderr_line};
use gantry_installer::record::InstallRecord;
use gantry_installer::resolve::VersionOverride;
use gantry_installer::version::VersionReference;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Some(Command::List(args)) => run_list(args),
        Some(Command::Install(args)) => run_install(args, stderr),
        None => run_install(&cli.install, stderr),
    }
}

/// Runs the install command: load, lock, install, report.
fn run_install(args: &InstallArgs, stderr: &mut dyn Write) -> Result<()> {
    let manifest_path = args.required_manifest()?;
    let manifest = Manifest::load(manifest_path)?;
    let target = determine_target_dir(args.target_dir.clone())?;
    let overrides = collect_overrides(args, &manifest)?;

    if args.dry_run {
        print_dry_run_info(&manifest, &target, stderr);
        return Ok(());
    }

    // Advisory mutual exclusion per target; readers never need it because
    // publication is a single rename.
    let _lock = if args.no_lock {
        None
    } else {
        Some(TargetLock::acquire(&target)?)
    };

    if !args.quiet {
        write_stderr_line(
            stderr,
            format!("Installing {} artifact(s) to {target}...", manifest.len()),
        );
    }

    let installed = install(&manifest, &target, &overrides, &HttpFetcher)?;

    if !args.quiet {
        write_stderr_line(stderr, success_message(installed.artifacts.len(), &target));
    }
    if args.verbosity > 0 {
        for (placeholder, version) in &installed.versions {
            write_stderr_line(stderr, format!("Resolved {placeholder} = {version}"));
        }
    }
    if args.json {
        println!("{}", installed_set_json(&installed)?);
    }
    Ok(())
}

/// Runs the list command against a target's install record.
fn run_list(args: &ListArgs) -> Result<()> {
    let target = determine_target_dir(args.target_dir.clone())?;
    let record = InstallRecord::load(&target)?;
    if args.json {
        println!("{}", render_json(&record)?);
    } else {
        println!("{}", render_text(&record, &target));
    }
    Ok(())
}

/// Determines the target directory from the CLI or the platform default.
fn determine_target_dir(cli_target: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    cli_target
        .or_else(|| default_target_dir(&SystemBaseDirs))
        .ok_or_else(|| InstallError::Staging {
            reason: "could not determine default target directory".to_owned(),
        })
}

/// Builds the run's version overrides: explicit `--pin` bindings first,
/// then a `latest` binding for every manifest endpoint left unbound.
fn collect_overrides(args: &InstallArgs, manifest: &Manifest) -> Result<Vec<VersionOverride>> {
    let mut overrides = args.overrides()?;
    for placeholder in manifest.endpoints().keys() {
        if !overrides.iter().any(|o| &o.placeholder == placeholder) {
            overrides.push(VersionOverride::from_reference(
                placeholder.clone(),
                VersionReference::Latest,
            ));
        }
    }
    Ok(overrides)
}

/// Prints dry run configuration information without side effects.
fn print_dry_run_info(manifest: &Manifest, target: &camino::Utf8Path, stderr: &mut dyn Write) {
    write_stderr_line(stderr, "Dry run - no files will be modified");
    write_stderr_line(stderr, "");
    write_stderr_line(stderr, format!("Target directory: {target}"));
    write_stderr_line(stderr, "");
    write_stderr_line(stderr, "Artifacts to install:");
    for spec in manifest.artifacts() {
        write_stderr_line(
            stderr,
            format!("  - {} ({}) from {}", spec.name, spec.phase, spec.locator),
        );
    }
}

/// Serializes the installed set for `--json` output.
fn installed_set_json(installed: &InstalledSet) -> Result<String> {
    serde_json::to_string_pretty(installed)
        .map_err(|e| InstallError::Io(std::io::Error::other(e)))
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
