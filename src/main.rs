// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Version | Options | Repos | Resources | Release | Exec | Pr
//! ```

use std::process::ExitCode;

use repo_fleet::cli::global::GlobalOptions;
use repo_fleet::cli::{self, Command};
use repo_fleet::cmd::config::run_options_command;
use repo_fleet::cmd::exec::run_exec_command;
use repo_fleet::cmd::pr::run_pr_command;
use repo_fleet::cmd::release::run_release_command;
use repo_fleet::cmd::repos::{run_repos_command, run_resources_command};
use repo_fleet::config::Config;
use repo_fleet::config::loader::ConfigLoader;
use repo_fleet::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_CONFIG: &str = "fleet.toml";
const ENV_PREFIX: &str = "FLEET";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if matches!(cli.command, Some(Command::Version)) {
        handle_version_command();
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(config: &Config) -> LogConfig {
    let global = &config.global;
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_json_file(global.json_log)
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Repos(args)) => run_repos_command(args, config),
        Some(Command::Resources) => run_resources_command(config),
        Some(Command::Release(args)) => run_release_command(args, config),
        Some(Command::Exec(args)) => run_exec_command(args, config).await,
        Some(Command::Pr(args)) => run_pr_command(args, config).await,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> repo_fleet::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for option in global.to_config_overrides() {
        loader = loader.set_override(&option)?;
    }
    Ok(loader)
}

fn load_config(global: &GlobalOptions) -> repo_fleet::error::Result<Config> {
    let mut config = build_config_loader(global)?.build()?;
    if !global.repos.is_empty() {
        config.paths.repositories.clone_from(&global.repos);
    }
    Ok(config)
}
