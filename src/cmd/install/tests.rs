// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use serial_test::serial;

use super::{
    InputSource, build_pipeline, parse_reference_list, read_reference_list, run_batch,
    run_install_command, run_options,
};
use crate::cli::install::InstallArgs;
use crate::config::Config;
use crate::error::{FsError, GitError, GoclError, ProcessError, Step};
use crate::git::Fetcher;
use crate::pipeline::{OutputSpec, Pipeline, RunOptions};
use crate::toolchain::Toolchain;

/// Clones succeed unless the URL contains "broken".
#[derive(Default)]
struct ListFetcher {
    urls: Mutex<Vec<String>>,
}

impl Fetcher for ListFetcher {
    fn clone_shallow<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<(), GitError>> {
        Box::pin(async move {
            self.urls.lock().expect("lock").push(url.to_string());
            if url.contains("broken") {
                return Err(GitError::CloneFailed {
                    url: url.to_string(),
                    message: "not found".to_string(),
                });
            }
            std::fs::create_dir_all(dest).expect("mkdir");
            std::fs::write(dest.join("go.sum"), "").expect("write");
            Ok(())
        })
    }
}

struct NoopToolchain;

impl Toolchain for NoopToolchain {
    fn tidy<'a>(&'a self, _dir: &'a Path) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async { Ok(()) })
    }

    fn init<'a>(&'a self, _dir: &'a Path, _m: &'a str) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async { Ok(()) })
    }

    fn build<'a>(
        &'a self,
        _dir: &'a Path,
        _output: &'a Path,
    ) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async { Ok(()) })
    }

    fn install<'a>(&'a self, _dir: &'a Path) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async { Ok(()) })
    }
}

#[test]
fn test_parse_reference_list() {
    let content = "\n  github.com/example/one  \n# comment\n\ngithub.com/example/two@v1\n\t\n";
    assert_eq!(
        parse_reference_list(content),
        vec!["github.com/example/one", "github.com/example/two@v1"]
    );
}

#[test]
fn test_input_detection() {
    let dir = tempfile::tempdir().expect("temp dir");
    let list = dir.path().join("urls.txt");
    std::fs::write(&list, "github.com/example/one\n").expect("write");

    let as_str = list.to_string_lossy().into_owned();
    assert_eq!(InputSource::detect(&as_str), InputSource::ListFile(list));
    assert_eq!(
        InputSource::detect(" github.com/example/tool "),
        InputSource::Single("github.com/example/tool".to_string())
    );
    assert_eq!(
        InputSource::detect(&dir.path().to_string_lossy()),
        InputSource::Single(dir.path().to_string_lossy().into_owned()),
        "a directory is not a list file"
    );
}

#[test]
fn test_read_missing_list() {
    let err = read_reference_list(Path::new("/nonexistent/urls.txt")).expect_err("missing");
    assert!(matches!(err, FsError::NotFound(_)), "{err:?}");
}

#[test]
fn test_run_options_from_args() {
    let args = InstallArgs {
        custom_path: Some(PathBuf::from("cmd/x")),
        output: Some(PathBuf::from("bin")),
        name: Some("x".to_string()),
        ..InstallArgs::default()
    };
    let options = run_options(&args);
    assert_eq!(options.custom_path, Some(PathBuf::from("cmd/x")));
    assert_eq!(
        options.output,
        OutputSpec::Directory {
            dir: PathBuf::from("bin"),
            name: Some("x".to_string()),
        }
    );

    let name_only = InstallArgs {
        name: Some("x".to_string()),
        ..InstallArgs::default()
    };
    assert_eq!(run_options(&name_only).output, OutputSpec::Install);
}

#[test]
fn test_missing_executable_fails_fast() {
    let mut config = Config::default();
    config.fetch.git = PathBuf::from("gocl-no-such-git");
    let err = build_pipeline(&config).expect_err("git is missing");
    match err {
        GoclError::Process(inner) => {
            assert!(
                matches!(*inner, ProcessError::ExecutableNotFound { ref name } if name == "gocl-no-such-git"),
                "{inner:?}"
            );
        }
        other => panic!("expected ExecutableNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_input_is_empty_batch() {
    let summary = run_install_command(&InstallArgs::default(), &Config::default())
        .await
        .expect("nothing to do");
    assert_eq!(summary.total(), 0);
    assert!(summary.is_success());
}

#[tokio::test]
async fn test_comment_only_list_is_empty_batch() {
    let dir = tempfile::tempdir().expect("temp dir");
    let list = dir.path().join("urls.txt");
    std::fs::write(&list, "# only comments\n").expect("write");
    let args = InstallArgs {
        input: Some(list.to_string_lossy().into_owned()),
        ..InstallArgs::default()
    };
    let summary = run_install_command(&args, &Config::default())
        .await
        .expect("empty list is not an error");
    assert_eq!(summary.total(), 0);
}

#[tokio::test]
#[serial]
async fn test_batch_continues_after_failure() {
    let fetcher = Arc::new(ListFetcher::default());
    let pipeline = Pipeline::new(fetcher.clone(), Arc::new(NoopToolchain));
    let references = vec![
        "github.com/example/one".to_string(),
        "github.com/example/broken".to_string(),
        "github.com/example/three@v3".to_string(),
    ];

    let summary = run_batch(&pipeline, &references, &RunOptions::default()).await;

    assert_eq!(
        *fetcher.urls.lock().expect("lock"),
        vec![
            "https://github.com/example/one",
            "https://github.com/example/broken",
            "https://github.com/example/three",
        ]
    );
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.succeeded.len(), 2);
    assert!(!summary.is_success());
    assert_eq!(summary.failed[0].step(), Step::Clone);
    assert_eq!(summary.failed[0].url(), "https://github.com/example/broken");
}
