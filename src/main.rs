mod api;
mod cache;
mod cli;
mod config;
mod error;
mod logging;
mod output;
mod parser;
mod planner;
mod prompt;
mod rename;
mod scanner;

use api::{ApiConfig, CachedClient, HttpClient, TvdbClient};
use cache::CacheStore;
use clap::Parser;
use cli::Args;
use config::Config;
use error::{AppError, ExitCode};
use planner::PlanOptions;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{debug, error, info};

fn main() {
    // Load .env if present; absence is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(args.verbose);

    match run(&args) {
        Ok(code) => std::process::exit(code.code()),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code().code());
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, AppError> {
    let target = args.target();
    // Cheap local check before any credentials or network come into play
    if !target.is_dir() {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", target.display()),
        )));
    }

    let mut config = Config::from_env()?;
    args.apply_to(&mut config);

    let api_config = ApiConfig::new(config.api_key.clone(), config.pin.clone());
    let http = HttpClient::new(api_config)?;
    let mut client: Box<dyn TvdbClient> = if args.no_cache {
        debug!("Cache bypassed for this run");
        Box::new(http)
    } else {
        let store = CacheStore::new(config.cache_dir());
        Box::new(CachedClient::new(http, store, config.ttls))
    };

    let opts = PlanOptions {
        order: config.order.clone(),
        lang: config.lang.clone(),
        format: config.format_options(),
        season_override: args.season,
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    if args.series {
        run_series(
            client.as_mut(),
            &target,
            &opts,
            args,
            &config,
            &mut input,
            &mut stdout,
        )
    } else {
        run_once(
            client.as_mut(),
            &target,
            &opts,
            args,
            &config,
            &mut input,
            &mut stdout,
        )
    }
}

/// Process every season directory under a series root, stopping at the
/// first run that does not come back clean.
fn run_series(
    client: &mut dyn TvdbClient,
    root: &Path,
    opts: &PlanOptions,
    args: &Args,
    config: &Config,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<ExitCode, AppError> {
    let mut season_dirs: Vec<_> = std::fs::read_dir(root)
        .map_err(AppError::Io)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .map(|n| planner::is_season_dir(&n.to_string_lossy()))
                    .unwrap_or(false)
        })
        .collect();
    season_dirs.sort();

    if season_dirs.is_empty() {
        info!("No season directories under {}", root.display());
        writeln!(out, "No season directories found.")?;
        return Ok(ExitCode::Success);
    }

    for dir in &season_dirs {
        writeln!(out, "== {} ==", dir.display())?;
        let code = run_once(client, dir, opts, args, config, input, out)?;
        if code != ExitCode::Success {
            return Ok(code);
        }
    }
    Ok(ExitCode::Success)
}

fn run_once(
    client: &mut dyn TvdbClient,
    dir: &Path,
    opts: &PlanOptions,
    args: &Args,
    config: &Config,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<ExitCode, AppError> {
    let (plan, stats) = planner::plan(client, dir, opts)?;

    if plan.is_empty() {
        writeln!(out, "No changes needed.")?;
        return Ok(ExitCode::Success);
    }

    let colors = output::colors_enabled();
    output::print_preview(&plan, &stats, args.detailed, colors, out)?;
    out.flush()?;

    if !args.yes {
        let accepted = prompt::confirm(input, out, plan.len(), config.strict_confirm)?;
        if !accepted {
            writeln!(out, "Cancelled.")?;
            return Ok(ExitCode::Cancelled);
        }
    }

    let result = planner::apply(&plan);
    output::print_apply_result(&result, colors, out)?;

    if result.errors + result.skipped == result.total && result.total > 0 {
        Ok(ExitCode::Failure)
    } else if result.errors > 0 || result.skipped > 0 {
        Ok(ExitCode::PartialFailure)
    } else {
        Ok(ExitCode::Success)
    }
}
