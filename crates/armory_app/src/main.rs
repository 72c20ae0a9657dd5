use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use armory_app::console::logging::{self, LogDestination};
use armory_app::console::{persistence, render, runner};
use armory_core::{update, ConsoleState, Msg, OperationPhase, PowerCategory};
use armory_engine::{
    load_dataset, stats_for_country, ApiSettings, ArmoryApi, DatasetKind, EngineHandle,
    HttpArmoryApi, InventoryFilter, InventoryStats, PollSettings, RetryPolicy,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "armory", version, about = "Military data acquisition console")]
struct Cli {
    /// Base URL of the acquisition service.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000")]
    base_url: String,
    /// Echo logs to the terminal in addition to ./armory.log.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one acquisition operation and watch it to completion.
    Scrape {
        /// Target country to scrape.
        #[arg(long)]
        country: String,
        /// Force category to acquire.
        #[arg(long, default_value = "airpower")]
        power: PowerCategory,
        /// Milliseconds between status polls.
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        /// Give up after this many consecutive failed status ticks.
        /// Without it, polling continues until the server reports a
        /// terminal phase or the process is interrupted.
        #[arg(long)]
        max_failures: Option<NonZeroU32>,
        /// Treat http 404 from the status endpoint as fatal.
        #[arg(long)]
        fail_on_missing_task: bool,
        /// Directory holding the persisted mission log.
        #[arg(long, default_value = ".")]
        state_dir: PathBuf,
    },
    /// Print the latest intel briefing.
    News,
    /// Load a unit dataset, filter it, and print the stats summary.
    Inventory {
        kind: DatasetKind,
        country: String,
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Exact service branch, e.g. "Air Force".
        #[arg(long)]
        service: Option<String>,
        /// Exact role, e.g. "Multirole".
        #[arg(long)]
        role: Option<String>,
        /// Exact country of origin.
        #[arg(long)]
        origin: Option<String>,
        /// Case-insensitive search over name, model, and description.
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the curated stat sheet for a country.
    Stats { country: String },
    /// Print the persisted mission log.
    Missions {
        #[arg(long, default_value = ".")]
        state_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let Cli {
        base_url,
        verbose,
        command,
    } = Cli::parse();

    logging::initialize(if verbose {
        LogDestination::Both
    } else {
        LogDestination::File
    });

    match command {
        Command::Scrape {
            country,
            power,
            interval_ms,
            max_failures,
            fail_on_missing_task,
            state_dir,
        } => run_scrape(
            &base_url,
            &country,
            power,
            interval_ms,
            max_failures,
            fail_on_missing_task,
            &state_dir,
        ),
        Command::News => run_news(&base_url),
        Command::Inventory {
            kind,
            country,
            data_dir,
            service,
            role,
            origin,
            search,
        } => run_inventory(kind, &country, &data_dir, service, role, origin, search),
        Command::Stats { country } => run_stats(&country),
        Command::Missions { state_dir } => run_missions(&state_dir),
    }
}

fn run_scrape(
    base_url: &str,
    country: &str,
    power: PowerCategory,
    interval_ms: u64,
    max_failures: Option<NonZeroU32>,
    fail_on_missing_task: bool,
    state_dir: &Path,
) -> anyhow::Result<()> {
    let api = HttpArmoryApi::new(ApiSettings {
        base_url: base_url.to_string(),
        ..ApiSettings::default()
    })?;
    let settings = PollSettings {
        interval: Duration::from_millis(interval_ms),
        retry: match max_failures {
            Some(max) => RetryPolicy::MaxConsecutiveFailures(max),
            None => RetryPolicy::Unlimited,
        },
        not_found_is_fatal: fail_on_missing_task,
    };
    let engine = EngineHandle::new(Arc::new(api), settings);

    let state = ConsoleState::new();
    let (state, _) = update(
        state,
        Msg::RestoreMissionLog(persistence::load_mission_log(state_dir)),
    );

    let view = runner::run_mission(&engine, state, state_dir, country, power, |view| {
        for line in render::render_mission(view) {
            println!("{line}");
        }
    });

    match view.phase {
        OperationPhase::Completed => Ok(()),
        OperationPhase::Error => anyhow::bail!(view
            .error
            .unwrap_or_else(|| "operation failed".to_string())),
        _ => anyhow::bail!(view
            .form_error
            .unwrap_or_else(|| "operation was not started".to_string())),
    }
}

fn run_news(base_url: &str) -> anyhow::Result<()> {
    let api = HttpArmoryApi::new(ApiSettings {
        base_url: base_url.to_string(),
        ..ApiSettings::default()
    })?;
    let runtime = tokio::runtime::Runtime::new().context("tokio runtime")?;
    let news = runtime.block_on(api.latest_news())?;

    for line in render::render_news(&news) {
        println!("{line}");
    }
    Ok(())
}

fn run_inventory(
    kind: DatasetKind,
    country: &str,
    data_dir: &Path,
    service: Option<String>,
    role: Option<String>,
    origin: Option<String>,
    search: Option<String>,
) -> anyhow::Result<()> {
    let units = load_dataset(data_dir, kind, country)?;
    let filter = InventoryFilter {
        service,
        role,
        country: origin,
        search,
    };
    let rows = filter.apply(&units);
    let stats = InventoryStats::collect(&units);

    for line in render::render_inventory(&rows, units.len(), &stats) {
        println!("{line}");
    }
    Ok(())
}

fn run_stats(country: &str) -> anyhow::Result<()> {
    let stats = stats_for_country(country)
        .with_context(|| format!("no curated stats for {country}"))?;

    for line in render::render_stats(country, stats) {
        println!("{line}");
    }
    Ok(())
}

fn run_missions(state_dir: &Path) -> anyhow::Result<()> {
    let state = ConsoleState::new();
    let (state, _) = update(
        state,
        Msg::RestoreMissionLog(persistence::load_mission_log(state_dir)),
    );

    for line in render::render_mission_log(&state.view()) {
        println!("{line}");
    }
    Ok(())
}
