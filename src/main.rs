// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config (layered + flags) --> Logging --> Ctrl-C watcher
//!   --> Command Dispatch: Info | Maintenance | TemplatePostClone | AssetsConfig | Version
//!   --> exit code: 0 ok, 1 failures, 2 usage
//! ```

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use repoman_rs::cli::global::GlobalOptions;
use repoman_rs::cli::{self, Command};
use repoman_rs::cmd::assets::run_assets_command;
use repoman_rs::cmd::info::run_info_command;
use repoman_rs::cmd::maintenance::run_maintenance_command;
use repoman_rs::cmd::template::run_template_command;
use repoman_rs::config::Config;
use repoman_rs::error::{RepomanError, RepomanResult};
use repoman_rs::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return ExitCode::from(USAGE_EXIT);
    };

    if matches!(command, Command::Version) {
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

    let log_config = build_log_config(&cli.global, &config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    watch_interrupt(cancel.clone());

    let result = dispatch_command(command, &config, cancel).await;
    exit_code(command, result)
}

fn load_config(global: &GlobalOptions) -> repoman_rs::error::Result<Config> {
    global
        .apply_overrides(Config::layered(&global.configs))?
        .build()
}

fn build_log_config(global: &GlobalOptions, config: &Config) -> LogConfig {
    let console_level = config.log.level.with_verbose(global.verbose);
    LogConfig::builder()
        .with_console_level(console_level)
        .maybe_with_log_file(config.log.file.as_ref().map(|p| p.display().to_string()))
        .build()
}

/// Cancels `token` on the first Ctrl-C; running subprocesses are killed.
fn watch_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling remaining work");
            token.cancel();
        }
    });
}

async fn dispatch_command(
    command: &Command,
    config: &Config,
    cancel: CancellationToken,
) -> RepomanResult<()> {
    match command {
        Command::Info(args) => run_info_command(args, config, cancel).await,
        Command::Maintenance(args) => run_maintenance_command(args, config, cancel).await,
        Command::TemplatePostClone(args) => run_template_command(args, config, cancel).await,
        Command::AssetsConfig(args) => run_assets_command(args, config, cancel).await,
        Command::Version => {
            handle_version_command();
            Ok(())
        }
    }
}

fn exit_code(command: &Command, result: RepomanResult<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_usage() => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {}", command.short_usage());
            ExitCode::from(USAGE_EXIT)
        }
        Err(RepomanError::Failures(failures)) => {
            eprintln!("Error: failed repositories ({}):", failures.len());
            eprintln!("{failures}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
