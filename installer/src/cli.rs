//! CLI argument definitions for the Gantry installer.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary small and focused
//! on orchestration.

use crate::error::{InstallError, Result};
use crate::resolve::VersionOverride;
use crate::version::VersionReference;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Install manifest-declared artifacts into an isolated target.
#[derive(Parser, Debug)]
#[command(name = "gantry-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install manifest-declared artifacts into an isolated target.\n\n",
    "Gantry reads a TOML manifest of named artifacts, each with a source ",
    "locator, an expected SHA-256 digest (pinned, or fetched from a vendor ",
    "checksum sidecar), and a buildtime/runtime phase tag. Every artifact is ",
    "fetched into a staging area and verified there; only when the whole ",
    "manifest passes is the staged set renamed into place, so a target is ",
    "never observable half-installed.\n\n",
    "Locators may embed {placeholder} version tokens. Placeholders bound to ",
    "the literal token `latest` are resolved at run time through the ",
    "manifest's [versions] endpoints, once per placeholder per run.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install a manifest into the default target directory:\n",
    "    $ gantry-installer install --manifest tools.toml\n\n",
    "  Pin a placeholder instead of resolving latest:\n",
    "    $ gantry-installer install -m tools.toml --pin kubernetes-version=v1.30.0\n\n",
    "  Preview without fetching anything:\n",
    "    $ gantry-installer install -m tools.toml --dry-run\n\n",
    "  List what a target contains:\n",
    "    $ gantry-installer list --target-dir ~/.local/share/gantry/tools\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install manifest artifacts (default when no subcommand given).
    Install(InstallArgs),

    /// List installed artifacts from a target's install record.
    List(ListArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone)]
pub struct InstallArgs {
    /// Manifest file to install.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Install target directory [default: platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub target_dir: Option<Utf8PathBuf>,

    /// Bind a version placeholder (can be repeated). REF is a concrete tag
    /// or the literal token `latest`.
    #[arg(long = "pin", value_name = "NAME=REF")]
    pub pin: Vec<String>,

    /// Show what would be installed and exit without fetching.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the installed set as JSON on success.
    #[arg(long)]
    pub json: bool,

    /// Skip the advisory target lock.
    #[arg(long)]
    pub no_lock: bool,

    /// Increase diagnostic verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Arguments for the list command.
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,

    /// Target directory to read [default: platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub target_dir: Option<Utf8PathBuf>,
}

impl InstallArgs {
    /// Parse the `--pin NAME=REF` bindings into version overrides.
    ///
    /// Endpoints for `latest` bindings are intentionally left unset here;
    /// the resolver falls back to the manifest's `[versions]` table.
    ///
    /// # Errors
    ///
    /// Returns a usage error when a binding is not of the form `NAME=REF`.
    pub fn overrides(&self) -> Result<Vec<VersionOverride>> {
        self.pin
            .iter()
            .map(|binding| {
                let (name, reference) =
                    binding
                        .split_once('=')
                        .ok_or_else(|| InstallError::Usage {
                            reason: format!(
                                "invalid --pin \"{binding}\": expected NAME=REF"
                            ),
                        })?;
                if name.trim().is_empty() {
                    return Err(InstallError::Usage {
                        reason: format!("invalid --pin \"{binding}\": empty placeholder name"),
                    });
                }
                let reference = VersionReference::from_token(reference);
                Ok(VersionOverride::from_reference(name.trim(), reference))
            })
            .collect()
    }

    /// The manifest path, required for a real install run.
    ///
    /// # Errors
    ///
    /// Returns a usage error when no manifest was given.
    pub fn required_manifest(&self) -> Result<&Utf8PathBuf> {
        self.manifest.as_ref().ok_or_else(|| InstallError::Usage {
            reason: "no manifest file specified; pass --manifest FILE".to_owned(),
        })
    }
}

impl Default for InstallArgs {
    /// Creates an `InstallArgs` instance with all flags disabled and no
    /// manifest selected. Useful for testing and programmatic construction.
    fn default() -> Self {
        Self {
            manifest: None,
            target_dir: None,
            pin: Vec::new(),
            dry_run: false,
            json: false,
            no_lock: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl Default for ListArgs {
    /// Creates a `ListArgs` instance with default settings.
    fn default() -> Self {
        Self {
            json: false,
            target_dir: None,
        }
    }
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments;
    /// otherwise returns the flattened install arguments.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::List(_)) | None => &self.install,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
