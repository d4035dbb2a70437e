// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Exo CLI entrypoint.
//!
//! Runs the technologies terminal against the portfolio REST API, or against a built-in demo
//! catalog with `--demo`.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use exo::api::{HttpTechnologyApi, MemoryTechnologyApi, TechnologyApi, DEFAULT_API_URL};
use exo::auth::{AuthState, AuthStore};
use exo::config::TerminalConfig;
use exo::terminal::Terminal;
use exo::tui::TuiOptions;
use tracing::{info, warn};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--api <url>] [--token <jwt>] [--no-boot] [--log-file <path>]\n  {program} --demo [--admin] [--no-boot] [--log-file <path>]\n\n--api defaults to $EXO_API_URL, then {DEFAULT_API_URL}.\n--token defaults to $EXO_TOKEN; an ADMIN or ROLE_ADMIN token unlocks the edit commands.\n--demo uses a built-in in-memory catalog; --admin (demo only) signs in as a local admin.\n--no-boot prints the boot banner at once instead of animating it.\n--log-file defaults to $TMPDIR/exo.log (filter with RUST_LOG)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    api: Option<String>,
    token: Option<String>,
    demo: bool,
    admin: bool,
    no_boot: bool,
    log_file: Option<PathBuf>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--api" => {
                if options.api.is_some() {
                    return Err(());
                }
                options.api = Some(args.next().ok_or(())?);
            }
            "--token" => {
                if options.token.is_some() {
                    return Err(());
                }
                options.token = Some(args.next().ok_or(())?);
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--admin" => {
                if options.admin {
                    return Err(());
                }
                options.admin = true;
            }
            "--no-boot" => {
                if options.no_boot {
                    return Err(());
                }
                options.no_boot = true;
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(PathBuf::from(args.next().ok_or(())?));
            }
            _ => return Err(()),
        }
    }

    if options.admin && !options.demo {
        return Err(());
    }

    if options.demo && options.api.is_some() {
        return Err(());
    }

    Ok(options)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn build_api(options: &CliOptions) -> Arc<dyn TechnologyApi> {
    if options.demo {
        info!("using demo catalog");
        return Arc::new(MemoryTechnologyApi::demo());
    }
    let base_url = options
        .api
        .clone()
        .or_else(|| env_value("EXO_API_URL"))
        .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
    info!(%base_url, "using catalog api");
    Arc::new(HttpTechnologyApi::new(base_url))
}

fn build_auth(options: &CliOptions, api: &dyn TechnologyApi) -> Result<AuthStore, Box<dyn Error>> {
    if options.demo && options.admin {
        return Ok(AuthStore::new(AuthState::local_admin()));
    }
    let token = options.token.clone().or_else(|| env_value("EXO_TOKEN"));
    let state = match token {
        Some(token) => {
            let state = AuthState::from_token(token)?;
            if !state.is_admin() {
                warn!("token grants no admin role");
            }
            api.set_token(state.token().map(str::to_owned));
            state
        }
        None => AuthState::anonymous(),
    };
    Ok(AuthStore::new(state))
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "exo".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let log_path = options
            .log_file
            .clone()
            .unwrap_or_else(exo::logging::default_log_path);
        exo::logging::init_file_logging(&log_path)?;

        let api = build_api(&options);
        let auth = build_auth(&options, api.as_ref())?;
        let engine = Terminal::new(api, auth.subscribe(), TerminalConfig::default());
        let tui_options = TuiOptions {
            animate_boot: !options.no_boot,
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            // The store must outlive the engine's subscription.
            let _auth = auth;
            let tui_result = tokio::task::spawn_blocking(move || {
                exo::tui::run(engine, tui_options).map_err(|err| err.to_string())
            })
            .await
            .map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| -> Box<dyn Error> { err.into() })
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("exo: {err}");
        std::process::exit(1);
    }
}
