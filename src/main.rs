use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use tracing::warn;

use polarclock::alarm::scheduler::{AlarmScheduler, next_occurrence};
use polarclock::alarm::store;

#[derive(Parser, Debug)]
#[command(
    name = "polarclock",
    version,
    about = "Polar-ring clock core: alarm scheduling and next-occurrence math"
)]
struct Cli {
    /// Path to the persisted alarm list.
    #[arg(long, default_value = "alarms.json")]
    alarms: PathBuf,

    /// Print the alarm list with each alarm's next occurrence (default).
    #[arg(long)]
    list: bool,

    /// Print the countdown for a single alarm id.
    #[arg(long, value_name = "ID")]
    next: Option<String>,

    /// Run the minute-tick loop and print fire events.
    #[arg(long)]
    watch: bool,

    /// Tick cadence for --watch, in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    tick_ms: u64,

    /// Stop --watch after this many seconds.
    #[arg(long)]
    watch_secs: Option<u64>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.tick_ms == 0 {
        bail!("--tick-ms must be greater than zero");
    }

    let alarms = store::load_alarms(&cli.alarms)
        .with_context(|| format!("failed to load {}", cli.alarms.display()))?;
    let mut scheduler = AlarmScheduler::new(alarms);

    if let Some(id) = cli.next.as_deref() {
        let countdown = scheduler.countdown(id, Local::now().naive_local())?;
        println!(
            "{} remaining until {} (ring progress {:.1}%)",
            format_remaining(countdown.remaining),
            countdown.next.format("%Y-%m-%d %H:%M"),
            countdown.progress * 100.0
        );
        return Ok(());
    }

    if cli.list || !cli.watch {
        list_alarms(&scheduler);
        return Ok(());
    }

    watch(&mut scheduler, &cli)
}

fn list_alarms(scheduler: &AlarmScheduler) {
    let now = Local::now().naive_local();
    println!("{} alarm(s)", scheduler.len());
    for record in scheduler.alarms() {
        let state = if record.enabled { "on " } else { "off" };
        let next = next_occurrence(record, now);
        println!(
            "{}  {:>8}  {:<20}  {}  next {}  {}",
            state,
            record.display_time(),
            format_days(&record.days),
            record.id,
            next.format("%Y-%m-%d %H:%M"),
            record.label.as_deref().unwrap_or("")
        );
    }
}

fn watch(scheduler: &mut AlarmScheduler, cli: &Cli) -> Result<()> {
    let tick = Duration::from_millis(cli.tick_ms);
    let deadline = cli
        .watch_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    println!(
        "watching {} alarm(s), ticking every {} ms",
        scheduler.len(),
        cli.tick_ms
    );

    loop {
        let now = Local::now().naive_local();
        let result = scheduler.tick(now);
        for id in &result.fired {
            let label = scheduler
                .get(id)
                .ok()
                .and_then(|record| record.label.clone())
                .unwrap_or_else(|| id.clone());
            println!("{}  FIRE  {label}", now.format("%H:%M"));
        }
        if result.needs_save
            && let Err(err) = store::save_alarms(&cli.alarms, scheduler.alarms())
        {
            // In-memory state stays authoritative; the next save
            // opportunity re-persists it.
            warn!("failed to persist auto-disabled alarm: {err:#}");
        }

        if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            return Ok(());
        }
        thread::sleep(tick);
    }
}

fn format_days(days: &[u8]) -> String {
    const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    if days.is_empty() {
        return "any day".to_string();
    }
    days.iter()
        .filter_map(|day| NAMES.get(usize::from(*day)).copied())
        .collect::<Vec<_>>()
        .join(",")
}

fn format_remaining(remaining: chrono::Duration) -> String {
    let total_minutes = remaining.num_minutes().max(0);
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}
