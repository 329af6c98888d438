//! BDD tests for the fetch-verify-publish installation workflow.

use camino::Utf8PathBuf;
use gantry_installer::error::InstallError;
use gantry_installer::install::{InstalledSet, install};
use gantry_installer::manifest::Manifest;
use gantry_installer::resolve::VersionOverride;
use gantry_installer::test_utils::{StubFetcher, sha256_hex};
use gantry_installer::version::LatestEndpoint;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const PAYLOAD: &[u8] = b"tool binary bytes";
const STABLE_URL: &str = "https://example.test/stable.txt";
const RESOLVED_VERSION: &str = "v1.30.0";

#[derive(Default)]
struct InstallWorld {
    _temp_dir: Option<tempfile::TempDir>,
    target: Option<Utf8PathBuf>,
    manifest: Option<Manifest>,
    fetcher: Option<StubFetcher>,
    overrides: Vec<VersionOverride>,
    result: Option<Result<InstalledSet, InstallError>>,
}

impl InstallWorld {
    fn fetcher(&self) -> &StubFetcher {
        self.fetcher.as_ref().expect("fetcher set")
    }

    fn result(&self) -> &Result<InstalledSet, InstallError> {
        self.result.as_ref().expect("result set")
    }
}

#[fixture]
fn world() -> InstallWorld {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let target =
        Utf8PathBuf::try_from(temp_dir.path().join("tools")).expect("UTF-8 path");
    InstallWorld {
        _temp_dir: Some(temp_dir),
        target: Some(target),
        ..Default::default()
    }
}

fn pinned_manifest(name: &str, locator: &str, digest: &str) -> Manifest {
    let document = format!(
        concat!(
            "[[artifact]]\n",
            "name = \"{name}\"\n",
            "locator = \"{locator}\"\n",
            "sha256 = \"{digest}\"\n",
            "phase = \"runtime\"\n",
        ),
        name = name,
        locator = locator,
        digest = digest
    );
    Manifest::from_toml_str(&document).expect("valid manifest")
}

#[given("a manifest with a pinned artifact \"{name}\"")]
fn given_pinned_manifest(world: &mut InstallWorld, name: String) {
    let locator = format!("https://example.test/{name}");
    world.manifest = Some(pinned_manifest(&name, &locator, &sha256_hex(PAYLOAD)));
}

#[given("the served bytes match the manifest digest")]
fn given_matching_bytes(world: &mut InstallWorld) {
    world.fetcher = Some(StubFetcher::new().with_body("https://example.test/kubectl", PAYLOAD));
}

#[given("the served bytes do not match the manifest digest")]
fn given_mismatched_bytes(world: &mut InstallWorld) {
    world.fetcher = Some(
        StubFetcher::new().with_body("https://example.test/kubectl", b"tampered bytes"),
    );
}

#[given("a manifest whose artifacts share the placeholder \"{placeholder}\"")]
fn given_shared_placeholder_manifest(world: &mut InstallWorld, placeholder: String) {
    let document = format!(
        concat!(
            "[[artifact]]\n",
            "name = \"kubectl\"\n",
            "locator = \"https://example.test/{{{p}}}/kubectl\"\n",
            "sha256 = \"{digest}\"\n",
            "phase = \"runtime\"\n",
            "\n",
            "[[artifact]]\n",
            "name = \"node-shim\"\n",
            "locator = \"https://example.test/{{{p}}}/node-shim\"\n",
            "sha256 = \"{digest}\"\n",
            "phase = \"runtime\"\n",
        ),
        p = placeholder,
        digest = sha256_hex(PAYLOAD)
    );
    world.manifest = Some(Manifest::from_toml_str(&document).expect("valid manifest"));
    world.fetcher = Some(
        StubFetcher::new()
            .with_text(STABLE_URL, &format!("{RESOLVED_VERSION}\n"))
            .with_body(
                &format!("https://example.test/{RESOLVED_VERSION}/kubectl"),
                PAYLOAD,
            )
            .with_body(
                &format!("https://example.test/{RESOLVED_VERSION}/node-shim"),
                PAYLOAD,
            ),
    );
}

#[given("the target directory already exists")]
fn given_existing_target(world: &mut InstallWorld) {
    let target = world.target.as_ref().expect("target set");
    std::fs::create_dir_all(target.as_std_path()).expect("create target");
}

fn run_install(world: &mut InstallWorld) {
    let manifest = world.manifest.as_ref().expect("manifest set");
    let target = world.target.as_ref().expect("target set");
    let fetcher = world.fetcher.as_ref().expect("fetcher set");
    world.result = Some(install(manifest, target, &world.overrides, fetcher));
}

#[when("the manifest is installed")]
fn when_installed(world: &mut InstallWorld) {
    run_install(world);
}

#[when("the manifest is installed with a latest binding for \"{placeholder}\"")]
fn when_installed_with_latest(world: &mut InstallWorld, placeholder: String) {
    world.overrides = vec![VersionOverride::latest(
        placeholder,
        LatestEndpoint::StableText(STABLE_URL.to_owned()),
    )];
    run_install(world);
}

#[then("the install succeeds")]
fn then_install_succeeds(world: &mut InstallWorld) {
    let result = world.result();
    assert!(result.is_ok(), "expected success, got {result:?}");
}

#[then("the target contains artifact \"{name}\"")]
fn then_target_contains(world: &mut InstallWorld, name: String) {
    let target = world.target.as_ref().expect("target set");
    assert!(
        target.join(&name).as_std_path().exists(),
        "expected {name} in {target}"
    );
}

#[then("the install fails with a digest mismatch for \"{name}\"")]
fn then_digest_mismatch(world: &mut InstallWorld, name: String) {
    match world.result() {
        Err(InstallError::DigestMismatch { artifact, .. }) => {
            assert_eq!(artifact.as_str(), name);
        }
        other => panic!("expected DigestMismatch, got {other:?}"),
    }
}

#[then("the target does not exist")]
fn then_target_absent(world: &mut InstallWorld) {
    let target = world.target.as_ref().expect("target set");
    assert!(!target.as_std_path().exists(), "target must stay absent");
}

#[then("the version endpoint was asked exactly once")]
fn then_endpoint_asked_once(world: &mut InstallWorld) {
    let asks = world
        .fetcher()
        .text_requests()
        .iter()
        .filter(|url| url.as_str() == STABLE_URL)
        .count();
    assert_eq!(asks, 1, "latest resolution must be memoized");
}

#[then("every installed locator embeds the resolved version")]
fn then_locators_share_version(world: &mut InstallWorld) {
    let set = match world.result() {
        Ok(set) => set,
        Err(e) => panic!("expected success, got {e:?}"),
    };
    for artifact in &set.artifacts {
        assert!(
            artifact.locator.contains(RESOLVED_VERSION),
            "locator {} must embed {RESOLVED_VERSION}",
            artifact.locator
        );
    }
}

#[then("the install fails because the target exists")]
fn then_target_exists_error(world: &mut InstallWorld) {
    assert!(matches!(
        world.result(),
        Err(InstallError::TargetExists { .. })
    ));
}

#[then("no artifact bytes were fetched")]
fn then_nothing_fetched(world: &mut InstallWorld) {
    assert!(world.fetcher().file_requests().is_empty());
    assert!(world.fetcher().text_requests().is_empty());
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Successful install publishes the runtime artifacts"
)]
fn scenario_successful_install(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Digest mismatch leaves the target untouched"
)]
fn scenario_digest_mismatch(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Latest is resolved once and used consistently"
)]
fn scenario_latest_memoized(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "A pre-existing target aborts before any fetch"
)]
fn scenario_existing_target(world: InstallWorld) {
    let _ = world;
}
