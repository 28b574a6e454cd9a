// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use std::path::PathBuf;

use clap::Parser;
use gocl_rs::cli::{Cli, USAGE};

// =============================================================================
// Install options
// =============================================================================

#[test]
fn cli_no_arguments() {
    let cli = Cli::try_parse_from(["gocl"]).expect("parses");
    assert!(cli.install.input.is_none());
    assert!(!cli.version);
    assert!(cli.global.configs.is_empty());
}

#[test]
fn cli_full_install_invocation() {
    let cli = Cli::try_parse_from([
        "gocl",
        "--input",
        "github.com/example/service@v1.4.0",
        "--custom-path",
        "cmd/service-client",
        "--output",
        "./bin",
        "--name",
        "svc",
        "--no-verify",
        "--in-place",
    ])
    .expect("parses");

    let install = &cli.install;
    assert_eq!(
        install.input.as_deref(),
        Some("github.com/example/service@v1.4.0")
    );
    assert_eq!(
        install.custom_path,
        Some(PathBuf::from("cmd/service-client"))
    );
    assert_eq!(install.output, Some(PathBuf::from("./bin")));
    assert_eq!(install.name.as_deref(), Some("svc"));
    assert!(install.no_verify);
    assert!(install.in_place);
}

#[test]
fn cli_short_flags() {
    let cli = Cli::try_parse_from(["gocl", "-i", "urls.txt", "-o", "out", "-n", "tool"])
        .expect("parses");
    assert_eq!(cli.install.input.as_deref(), Some("urls.txt"));
    assert_eq!(cli.install.output, Some(PathBuf::from("out")));
    assert_eq!(cli.install.name.as_deref(), Some("tool"));
}

// =============================================================================
// Global options
// =============================================================================

#[test]
fn cli_repeated_config_files() {
    let cli = Cli::try_parse_from([
        "gocl",
        "--config",
        "a.toml",
        "--config",
        "b.toml",
        "-l",
        "5",
        "--file-log-level",
        "6",
        "--log-file",
        "gocl.log",
    ])
    .expect("parses");

    assert_eq!(
        cli.global.configs,
        vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(cli.global.file_log_level, Some(6));
    assert_eq!(cli.global.log_file, Some(PathBuf::from("gocl.log")));
}

#[test]
fn cli_rejects_unknown_flag() {
    let err = Cli::try_parse_from(["gocl", "--depth", "2"]).expect_err("unknown flag");
    assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
}

#[test]
fn cli_rejects_short_version_flag() {
    assert!(Cli::try_parse_from(["gocl", "-V"]).is_err());
}

// =============================================================================
// Usage
// =============================================================================

#[test]
fn cli_usage_text() {
    insta::assert_snapshot!(USAGE, @r"
    Usage:
     gocl -i github.com/example/tool
     gocl -i github.com/example/service -c cmd/service-client
     gocl -i urls.txt

    urls.txt:
     github.com/example/tool
     github.com/example/other
    ");
}
