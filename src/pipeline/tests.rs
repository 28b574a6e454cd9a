// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use serial_test::serial;
use tempfile::TempDir;

use super::{
    BootstrapOutcome, CandidateRule, CloneLayout, DisposableClone, OutputSpec, PathProbe,
    Pipeline, RunOptions, WorkingContext, bootstrap, normalize, resolve_target,
};
use crate::error::{
    BootstrapStep, GitError, NetworkError, PipelineError, ProcessError, ResolveError, Step,
};
use crate::git::Fetcher;
use crate::net::ReachabilityProbe;
use crate::toolchain::Toolchain;

// --- Fakes ---

/// Materializes a fixed tree at the clone destination.
#[derive(Default)]
struct FakeFetcher {
    dirs: Vec<&'static str>,
    files: Vec<&'static str>,
    fail: bool,
    root_is_file: bool,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeFetcher {
    fn with_dirs(dirs: &[&'static str]) -> Self {
        Self {
            dirs: dirs.to_vec(),
            ..Self::default()
        }
    }

    fn file(mut self, file: &'static str) -> Self {
        self.files.push(file);
        self
    }

    /// Leaves a regular file where the clone root should be.
    fn file_at_root() -> Self {
        Self {
            root_is_file: true,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn destinations(&self) -> Vec<PathBuf> {
        self.calls.lock().expect("lock").clone()
    }
}

impl Fetcher for FakeFetcher {
    fn clone_shallow<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<(), GitError>> {
        Box::pin(async move {
            self.calls.lock().expect("lock").push(dest.to_path_buf());
            if self.fail {
                return Err(GitError::CloneFailed {
                    url: url.to_string(),
                    message: "repository not found".to_string(),
                });
            }
            if self.root_is_file {
                std::fs::write(dest, "").expect("write clone root");
                return Ok(());
            }
            std::fs::create_dir_all(dest).expect("create clone root");
            for dir in &self.dirs {
                std::fs::create_dir_all(dest.join(dir)).expect("create dir");
            }
            for file in &self.files {
                std::fs::write(dest.join(file), "").expect("write file");
            }
            Ok(())
        })
    }
}

/// Records every toolchain call as "<op> <arg>" and fails on request.
#[derive(Default)]
struct FakeToolchain {
    tidy_failures: AtomicUsize,
    fail_init: bool,
    fail_build: bool,
    fail_install: bool,
    /// Replaces the clone root with a plain file during install.
    clobber_on_install: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeToolchain {
    fn tidy_fails(times: usize) -> Self {
        Self {
            tidy_failures: AtomicUsize::new(times),
            ..Self::default()
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn result(fail: bool, command: &str) -> Result<(), ProcessError> {
        if fail {
            Err(ProcessError::NonZeroExit {
                command: command.to_string(),
                code: 1,
            })
        } else {
            Ok(())
        }
    }
}

impl Toolchain for FakeToolchain {
    fn tidy<'a>(&'a self, _dir: &'a Path) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async move {
            self.record("tidy".to_string());
            let fail = self
                .tidy_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            Self::result(fail, "go mod tidy")
        })
    }

    fn init<'a>(
        &'a self,
        _dir: &'a Path,
        module_path: &'a str,
    ) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async move {
            self.record(format!("init {module_path}"));
            Self::result(self.fail_init, "go mod init")
        })
    }

    fn build<'a>(
        &'a self,
        _dir: &'a Path,
        output: &'a Path,
    ) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async move {
            self.record(format!("build {}", output.display()));
            Self::result(self.fail_build, "go build")
        })
    }

    fn install<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async move {
            let cwd = std::env::current_dir().expect("cwd");
            assert_eq!(
                std::fs::canonicalize(&cwd).expect("canonicalize"),
                std::fs::canonicalize(dir).expect("canonicalize"),
                "install must run from the build target"
            );
            self.record("install".to_string());
            if self.clobber_on_install {
                std::fs::remove_dir_all(dir).expect("remove clone");
                std::fs::write(dir, "").expect("write file");
            }
            Self::result(self.fail_install, "go install")
        })
    }
}

struct FixedProbe(u16);

impl ReachabilityProbe for FixedProbe {
    fn probe<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<u16, NetworkError>> {
        Box::pin(async move { Ok(self.0) })
    }
}

/// Answers `is_dir` from a fixed set of paths.
struct SetProbe(HashSet<PathBuf>);

impl SetProbe {
    fn new(root: &Path, dirs: &[&str]) -> Self {
        Self(dirs.iter().map(|d| root.join(d)).collect())
    }
}

impl PathProbe for SetProbe {
    fn is_dir(&self, path: &Path) -> bool {
        self.0.contains(path)
    }
}

/// Claims every candidate exists, whether or not it is on disk.
struct EveryDirProbe;

impl PathProbe for EveryDirProbe {
    fn is_dir(&self, _path: &Path) -> bool {
        true
    }
}

/// Switches the process into a fresh directory for one test.
struct Sandbox {
    _dir: TempDir,
    previous: PathBuf,
    cwd: PathBuf,
}

impl Sandbox {
    fn enter() -> Self {
        let previous = std::env::current_dir().expect("cwd");
        let dir = tempfile::tempdir().expect("temp dir");
        std::env::set_current_dir(dir.path()).expect("chdir");
        let cwd = std::env::current_dir().expect("cwd");
        Self {
            _dir: dir,
            previous,
            cwd,
        }
    }

    fn assert_cwd_restored(&self) {
        assert_eq!(std::env::current_dir().expect("cwd"), self.cwd);
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}

fn pipeline(fetcher: &Arc<FakeFetcher>, toolchain: &Arc<FakeToolchain>) -> Pipeline {
    Pipeline::new(fetcher.clone(), toolchain.clone())
}

// --- Reference ---

#[test]
fn test_normalize_strips_version_and_adds_scheme() {
    let reference = normalize("github.com/example/tool@v1.2.0");
    assert_eq!(reference.url(), "https://github.com/example/tool");
    assert_eq!(reference.short_name(), "tool");
    assert_eq!(reference.module_path(), "github.com/example/tool");
    assert_eq!(reference.raw(), "github.com/example/tool@v1.2.0");
}

#[test]
fn test_normalize_keeps_existing_scheme() {
    assert_eq!(
        normalize("https://github.com/example/tool").url(),
        "https://github.com/example/tool"
    );
    assert_eq!(
        normalize("http://git.local/team/tool").url(),
        "http://git.local/team/tool"
    );
    let local = normalize("file:///srv/git/tool.git");
    assert_eq!(local.url(), "file:///srv/git/tool.git");
    assert_eq!(local.short_name(), "tool");
}

#[test]
fn test_normalize_is_idempotent() {
    for raw in [
        "github.com/example/tool",
        "  github.com/example/tool@latest  ",
        "https://gitlab.com/group/sub/tool.git",
        "http://git.local/tool/",
        "",
    ] {
        let once = normalize(raw);
        let twice = normalize(once.url());
        assert_eq!(once.url(), twice.url(), "{raw:?}");
        assert_eq!(once.short_name(), twice.short_name(), "{raw:?}");
    }
}

#[test]
fn test_normalize_short_name_edge_cases() {
    insta::assert_snapshot!(
        [
            "github.com/example/tool/",
            "github.com/example/tool.git",
            "https://github.com/example/tool.git@v2",
            "@v1.0.0",
        ]
        .iter()
        .map(|raw| {
            let r = normalize(raw);
            format!("{raw} -> {} [{}] {}", r.url(), r.short_name(), r.is_well_formed())
        })
        .collect::<Vec<_>>()
        .join("\n"),
        @r"
    github.com/example/tool/ -> https://github.com/example/tool/ [tool] true
    github.com/example/tool.git -> https://github.com/example/tool.git [tool] true
    https://github.com/example/tool.git@v2 -> https://github.com/example/tool.git [tool] true
    @v1.0.0 -> https:// [] false
    "
    );
}

// --- Resolution ---

#[test]
fn test_resolve_prefers_cmd_when_v2_absent() {
    let root = Path::new("/clone/tool");
    let probe = SetProbe::new(root, &["cmd/tool"]);
    let target = resolve_target(root, "tool", None, &probe).expect("resolves");
    assert_eq!(target.path(), root.join("cmd/tool"));
    assert_eq!(target.rule(), CandidateRule::Cmd);
}

#[test]
fn test_resolve_prefers_v2_over_cmd() {
    let root = Path::new("/clone/tool");
    let probe = SetProbe::new(root, &["cmd/tool", "v2/cmd/tool"]);
    let target = resolve_target(root, "tool", None, &probe).expect("resolves");
    assert_eq!(target.rule(), CandidateRule::V2Cmd);
    assert_eq!(target.path(), root.join("v2/cmd/tool"));
}

#[test]
fn test_resolve_custom_path_wins() {
    let root = Path::new("/clone/tool");
    let probe = SetProbe::new(root, &["cmd/tool", "tools/gen"]);
    let target =
        resolve_target(root, "tool", Some(Path::new("tools/gen")), &probe).expect("resolves");
    assert_eq!(target.rule(), CandidateRule::CustomPath);
    assert_eq!(target.path(), root.join("tools/gen"));
}

#[test]
fn test_resolve_missing_custom_path_does_not_fall_back() {
    let root = Path::new("/clone/tool");
    let probe = SetProbe::new(root, &["cmd/tool"]);
    let err = resolve_target(root, "tool", Some(Path::new("nope")), &probe)
        .expect_err("custom path is missing");
    assert!(matches!(err, ResolveError::CustomPathNotFound { .. }), "{err:?}");
}

#[test]
fn test_resolve_rejects_escaping_custom_path() {
    let root = Path::new("/clone/tool");
    let probe = SetProbe::new(root, &[]);
    for custom in ["../elsewhere", "/etc"] {
        let err = resolve_target(root, "tool", Some(Path::new(custom)), &probe)
            .expect_err("escapes clone");
        assert!(
            matches!(err, ResolveError::CustomPathOutsideClone { .. }),
            "{custom}: {err:?}"
        );
    }
}

#[test]
fn test_resolve_falls_back_to_root() {
    let root = Path::new("/clone/tool");
    let probe = SetProbe::new(root, &[]);
    let target = resolve_target(root, "tool", None, &probe).expect("resolves");
    assert_eq!(target.rule(), CandidateRule::Root);
    assert_eq!(target.path(), root);
}

// --- Bootstrap ---

#[tokio::test]
async fn test_bootstrap_skips_when_go_sum_present() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("go.sum"), "").expect("write");
    let toolchain = FakeToolchain::default();

    let outcome = bootstrap(&toolchain, dir.path(), "example.com/tool")
        .await
        .expect("bootstrap");
    assert_eq!(outcome, BootstrapOutcome::AlreadyPresent);
    assert!(toolchain.calls().is_empty());
}

#[tokio::test]
async fn test_bootstrap_never_inits_when_go_mod_present() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("go.mod"), "module x\n").expect("write");
    let toolchain = FakeToolchain::tidy_fails(1);

    let err = bootstrap(&toolchain, dir.path(), "example.com/tool")
        .await
        .expect_err("tidy fails");
    assert_eq!(err.step, BootstrapStep::Tidy);
    assert_eq!(toolchain.calls(), vec!["tidy"]);
}

#[tokio::test]
async fn test_bootstrap_initializes_missing_module() {
    let dir = tempfile::tempdir().expect("temp dir");
    let toolchain = FakeToolchain::tidy_fails(1);

    let outcome = bootstrap(&toolchain, dir.path(), "example.com/tool")
        .await
        .expect("bootstrap");
    assert_eq!(outcome, BootstrapOutcome::Initialized);
    assert_eq!(
        toolchain.calls(),
        vec!["tidy", "init example.com/tool", "tidy"]
    );
}

#[tokio::test]
async fn test_bootstrap_reports_last_failing_step() {
    let dir = tempfile::tempdir().expect("temp dir");

    let init_fails = FakeToolchain {
        fail_init: true,
        ..FakeToolchain::tidy_fails(1)
    };
    let err = bootstrap(&init_fails, dir.path(), "example.com/tool")
        .await
        .expect_err("init fails");
    assert_eq!(err.step, BootstrapStep::Init);
    assert_eq!(init_fails.calls(), vec!["tidy", "init example.com/tool"]);

    let retry_fails = FakeToolchain::tidy_fails(2);
    let err = bootstrap(&retry_fails, dir.path(), "example.com/tool")
        .await
        .expect_err("retry fails");
    assert_eq!(err.step, BootstrapStep::RetryTidy);
}

// --- Output ---

#[test]
fn test_artifact_path_is_anchored_at_original_dir() {
    let original = Path::new("/work");
    let spec = OutputSpec::from_parts(Some(PathBuf::from("./bin")), Some("mytool".to_string()));
    assert_eq!(
        spec.artifact_path(original, "tool"),
        Some(PathBuf::from("/work/bin/mytool"))
    );

    let unnamed = OutputSpec::from_parts(Some(PathBuf::from("out")), None);
    assert_eq!(
        unnamed.artifact_path(original, "tool"),
        Some(PathBuf::from("/work/out/tool"))
    );
}

#[test]
fn test_install_has_no_artifact_path() {
    let spec = OutputSpec::from_parts(None, Some("ignored".to_string()));
    assert_eq!(spec, OutputSpec::Install);
    assert_eq!(spec.artifact_path(Path::new("/work"), "tool"), None);
}

// --- Workspace ---

#[test]
#[serial]
fn test_working_context_restores_on_drop() {
    let sandbox = Sandbox::enter();
    let inner = sandbox.cwd.join("inner");
    std::fs::create_dir(&inner).expect("mkdir");
    {
        let mut context = WorkingContext::capture().expect("capture");
        context.enter(&inner).expect("enter");
        assert_eq!(std::env::current_dir().expect("cwd"), inner);
    }
    sandbox.assert_cwd_restored();
}

#[test]
fn test_unarmed_clone_is_left_alone() {
    let base = tempfile::tempdir().expect("temp dir");
    let clone =
        DisposableClone::allocate(CloneLayout::InPlace, base.path(), "tool").expect("allocate");
    std::fs::create_dir(clone.path()).expect("mkdir");
    assert!(!clone.is_armed());
    let path = clone.path().to_path_buf();
    clone.remove().expect("remove");
    assert!(path.exists());
}

#[test]
fn test_armed_isolated_clone_is_removed_on_drop() {
    let base = tempfile::tempdir().expect("temp dir");
    let path = {
        let mut clone = DisposableClone::allocate(CloneLayout::Isolated, base.path(), "tool")
            .expect("allocate");
        std::fs::create_dir_all(clone.path().join("cmd/tool")).expect("mkdir");
        clone.arm();
        clone.path().to_path_buf()
    };
    assert!(!path.exists());
    assert!(path.parent().is_some_and(|temp_root| !temp_root.exists()));
}

// --- Pipeline ---

#[tokio::test]
#[serial]
async fn test_run_installs_from_cmd_directory() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&["cmd/tool"]));
    let toolchain = Arc::new(FakeToolchain::default());

    let report = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect("run succeeds");

    assert_eq!(report.url, "https://github.com/example/tool");
    assert_eq!(report.target, PathBuf::from("cmd/tool"));
    assert_eq!(report.rule, CandidateRule::Cmd);
    assert_eq!(report.bootstrap, BootstrapOutcome::Tidied);
    assert_eq!(report.artifact, None);
    assert_eq!(toolchain.calls(), vec!["tidy", "install"]);

    sandbox.assert_cwd_restored();
    let dests = fetcher.destinations();
    assert_eq!(dests.len(), 1);
    assert!(!dests[0].exists(), "clone should be removed");
}

#[tokio::test]
#[serial]
async fn test_run_builds_into_output_directory() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&[]).file("go.sum"));
    let toolchain = Arc::new(FakeToolchain::default());
    let options = RunOptions {
        custom_path: None,
        output: OutputSpec::from_parts(Some(PathBuf::from("./bin")), Some("mytool".to_string())),
    };

    let report = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &options)
        .await
        .expect("run succeeds");

    let expected = sandbox.cwd.join("bin").join("mytool");
    assert_eq!(report.artifact.as_deref(), Some(expected.as_path()));
    assert_eq!(report.rule, CandidateRule::Root);
    assert_eq!(report.bootstrap, BootstrapOutcome::AlreadyPresent);
    assert!(sandbox.cwd.join("bin").is_dir());
    assert_eq!(
        toolchain.calls(),
        vec![format!("build {}", expected.display())]
    );
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_run_custom_path_wins_over_cmd() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&["cmd/tool", "tools/gen"]));
    let toolchain = Arc::new(FakeToolchain::default());
    let options = RunOptions {
        custom_path: Some(PathBuf::from("tools/gen")),
        ..RunOptions::default()
    };

    let report = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &options)
        .await
        .expect("run succeeds");

    assert_eq!(report.target, PathBuf::from("tools/gen"));
    assert_eq!(report.rule, CandidateRule::CustomPath);
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_missing_custom_path_removes_clone() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&["cmd/tool"]));
    let toolchain = Arc::new(FakeToolchain::default());
    let options = RunOptions {
        custom_path: Some(PathBuf::from("nope")),
        ..RunOptions::default()
    };

    let err = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &options)
        .await
        .expect_err("custom path is missing");

    insta::assert_snapshot!(err.to_string(), @"https://github.com/example/tool: custom path nope does not exist");
    assert_eq!(err.step(), Step::Resolve);
    assert!(toolchain.calls().is_empty());
    assert!(!fetcher.destinations()[0].exists());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_bootstrap_failure_removes_clone_and_restores_cwd() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&["cmd/tool"]).file("cmd/tool/go.mod"));
    let toolchain = Arc::new(FakeToolchain::tidy_fails(1));

    let err = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect_err("tidy fails");

    match &err {
        PipelineError::BootstrapFailed { source, .. } => {
            assert_eq!(source.step, BootstrapStep::Tidy);
        }
        other => panic!("expected BootstrapFailed, got {other:?}"),
    }
    assert_eq!(toolchain.calls(), vec!["tidy"]);
    assert!(!fetcher.destinations()[0].exists());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_install_failure_is_reported() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&[]));
    let toolchain = Arc::new(FakeToolchain {
        fail_install: true,
        ..FakeToolchain::default()
    });

    let err = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect_err("install fails");

    assert_eq!(err.step(), Step::Install);
    assert!(!fetcher.destinations()[0].exists());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_unreachable_repository_aborts_before_clone() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&["cmd/tool"]));
    let toolchain = Arc::new(FakeToolchain::default());

    let err = pipeline(&fetcher, &toolchain)
        .with_probe(Arc::new(FixedProbe(404)))
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect_err("probe rejects");

    insta::assert_snapshot!(err.to_string(), @r#"repository "https://github.com/example/tool" is invalid or inaccessible: received status code 404 from https://github.com/example/tool"#);
    assert!(fetcher.destinations().is_empty());
    assert!(toolchain.calls().is_empty());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_reachable_repository_proceeds() {
    let _sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&[]));
    let toolchain = Arc::new(FakeToolchain::default());

    pipeline(&fetcher, &toolchain)
        .with_probe(Arc::new(FixedProbe(204)))
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect("run succeeds");
    assert_eq!(fetcher.destinations().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_clone_failure_skips_toolchain() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::failing());
    let toolchain = Arc::new(FakeToolchain::default());

    let err = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect_err("clone fails");

    assert_eq!(err.step(), Step::Clone);
    assert!(toolchain.calls().is_empty());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_invalid_reference_does_nothing() {
    let _sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&[]));
    let toolchain = Arc::new(FakeToolchain::default());

    let err = pipeline(&fetcher, &toolchain)
        .run(&normalize("   "), &RunOptions::default())
        .await
        .expect_err("empty reference");

    assert!(matches!(err, PipelineError::InvalidReference { .. }));
    assert!(fetcher.destinations().is_empty());
}

#[tokio::test]
#[serial]
async fn test_in_place_layout_clones_under_cwd_and_cleans_up() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&["cmd/tool"]));
    let toolchain = Arc::new(FakeToolchain::default());

    pipeline(&fetcher, &toolchain)
        .with_layout(CloneLayout::InPlace)
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect("run succeeds");

    assert_eq!(fetcher.destinations(), vec![sandbox.cwd.join("tool")]);
    assert!(!sandbox.cwd.join("tool").exists());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_in_place_layout_never_deletes_existing_directory() {
    let sandbox = Sandbox::enter();
    let existing = sandbox.cwd.join("tool");
    std::fs::create_dir(&existing).expect("mkdir");
    std::fs::write(existing.join("keep.txt"), "mine").expect("write");

    let fetcher = Arc::new(FakeFetcher::with_dirs(&[]));
    let toolchain = Arc::new(FakeToolchain::default());
    let err = pipeline(&fetcher, &toolchain)
        .with_layout(CloneLayout::InPlace)
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect_err("destination exists");

    assert_eq!(err.step(), Step::Clone);
    assert!(fetcher.destinations().is_empty());
    assert!(existing.join("keep.txt").is_file());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_escaping_custom_path_is_rejected() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&["cmd/tool"]));
    let toolchain = Arc::new(FakeToolchain::default());
    let options = RunOptions {
        custom_path: Some(PathBuf::from("../elsewhere")),
        ..RunOptions::default()
    };

    let err = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &options)
        .await
        .expect_err("custom path escapes the clone");

    assert!(matches!(err, PipelineError::CustomPathRejected { .. }), "{err:?}");
    insta::assert_snapshot!(err.to_string(), @"https://github.com/example/tool: custom path ../elsewhere must stay inside the repository");
    assert_eq!(err.step(), Step::Resolve);
    assert!(toolchain.calls().is_empty());
    assert!(!fetcher.destinations()[0].exists());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_directory_change_failure_removes_clone() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&[]));
    let toolchain = Arc::new(FakeToolchain::default());

    let err = pipeline(&fetcher, &toolchain)
        .with_path_probe(Arc::new(EveryDirProbe))
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect_err("v2/cmd/tool is not on disk");

    match &err {
        PipelineError::DirectoryChangeFailed { path, .. } => {
            assert!(path.ends_with("v2/cmd/tool"), "{}", path.display());
        }
        other => panic!("expected DirectoryChangeFailed, got {other:?}"),
    }
    assert_eq!(err.step(), Step::Resolve);
    assert!(toolchain.calls().is_empty());
    assert!(!fetcher.destinations()[0].exists());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_primary_error_wins_over_cleanup_failure() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::file_at_root());
    let toolchain = Arc::new(FakeToolchain::default());

    // entering and removing a regular file both fail
    let err = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect_err("clone root is not a directory");

    assert!(matches!(err, PipelineError::DirectoryChangeFailed { .. }), "{err:?}");
    assert!(toolchain.calls().is_empty());
    sandbox.assert_cwd_restored();
}

#[tokio::test]
#[serial]
async fn test_cleanup_failure_fails_an_otherwise_successful_run() {
    let sandbox = Sandbox::enter();
    let fetcher = Arc::new(FakeFetcher::with_dirs(&[]).file("go.sum"));
    let toolchain = Arc::new(FakeToolchain {
        clobber_on_install: true,
        ..FakeToolchain::default()
    });

    let err = pipeline(&fetcher, &toolchain)
        .run(&normalize("github.com/example/tool"), &RunOptions::default())
        .await
        .expect_err("clone root cannot be removed as a directory");

    match &err {
        PipelineError::CleanupFailed { path, .. } => {
            assert_eq!(path, &fetcher.destinations()[0]);
        }
        other => panic!("expected CleanupFailed, got {other:?}"),
    }
    assert_eq!(err.step(), Step::Cleanup);
    assert_eq!(toolchain.calls(), vec!["install"]);
    sandbox.assert_cwd_restored();
}
