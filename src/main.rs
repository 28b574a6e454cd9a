// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> --version? --> Config --> Logging --> no input? usage
//!                                                    --> run_install_command
//! ```

use std::process::ExitCode;

use gocl_rs::cli::{self, Cli, USAGE, version_line};
use gocl_rs::cmd::install::run_install_command;
use gocl_rs::config::types::GlobalConfig;
use gocl_rs::config::{Config, ENV_PREFIX, LOCAL_CONFIG_FILE};
use gocl_rs::error::GoclResult;
use gocl_rs::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if cli.version {
        println!("{}", version_line());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&build_log_config(&config.global)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if cli.install.input.is_none() {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run_install_command(&cli.install, &config).await {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_log_config(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.clone())
        .build()
}

fn load_config(cli: &Cli) -> GoclResult<Config> {
    let loader = Config::builder().add_toml_file_optional(LOCAL_CONFIG_FILE);
    let loader = cli
        .global
        .add_config_files(loader)
        .with_env_prefix(ENV_PREFIX);
    let loader = cli.global.apply_overrides(loader)?;
    let loader = cli.install.apply_overrides(loader)?;
    Ok(loader.build()?)
}
