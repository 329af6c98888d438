//! Tests for CLI argument parsing.

use super::*;
use rstest::rstest;

#[test]
fn defaults_to_install_with_flattened_args() {
    let cli = Cli::parse_from(["gantry-installer", "--manifest", "tools.toml"]);
    assert!(cli.command.is_none());
    let args = cli.install_args();
    assert_eq!(
        args.manifest.as_deref(),
        Some(camino::Utf8Path::new("tools.toml"))
    );
}

#[test]
fn install_subcommand_carries_its_own_args() {
    let cli = Cli::parse_from([
        "gantry-installer",
        "install",
        "--manifest",
        "tools.toml",
        "--target-dir",
        "/opt/tools",
    ]);
    let args = cli.install_args();
    assert_eq!(
        args.target_dir.as_deref(),
        Some(camino::Utf8Path::new("/opt/tools"))
    );
}

#[test]
fn list_subcommand_parses() {
    let cli = Cli::parse_from(["gantry-installer", "list", "--json"]);
    match cli.command {
        Some(Command::List(args)) => assert!(args.json),
        other => panic!("expected list subcommand, got {other:?}"),
    }
}

#[test]
fn pin_bindings_parse_into_overrides() {
    let cli = Cli::parse_from([
        "gantry-installer",
        "--manifest",
        "tools.toml",
        "--pin",
        "kubernetes-version=v1.30.0",
        "--pin",
        "kind-version=latest",
    ]);
    let overrides = cli.install_args().overrides().expect("valid bindings");
    assert_eq!(overrides.len(), 2);
    assert_eq!(overrides[0].placeholder, "kubernetes-version");
    assert_eq!(
        overrides[0].reference,
        VersionReference::Pinned("v1.30.0".to_owned())
    );
    assert_eq!(overrides[1].placeholder, "kind-version");
    assert!(overrides[1].reference.is_latest());
}

#[rstest]
#[case::no_equals("kubernetes-version")]
#[case::empty_name("=v1.0.0")]
fn malformed_pin_bindings_are_usage_errors(#[case] binding: &str) {
    let args = InstallArgs {
        pin: vec![binding.to_owned()],
        ..InstallArgs::default()
    };
    let result = args.overrides();
    assert!(matches!(result, Err(InstallError::Usage { .. })));
}

#[test]
fn required_manifest_errors_when_absent() {
    let args = InstallArgs::default();
    assert!(matches!(
        args.required_manifest(),
        Err(InstallError::Usage { .. })
    ));
}

#[test]
fn quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["gantry-installer", "--quiet", "-v"]);
    assert!(result.is_err());
}

#[test]
fn verbosity_counts_repeated_flags() {
    let cli = Cli::parse_from(["gantry-installer", "-vv", "--manifest", "tools.toml"]);
    assert_eq!(cli.install_args().verbosity, 2);
}
