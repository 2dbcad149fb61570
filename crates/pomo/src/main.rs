//! pomo - Pomodoro timer in the terminal
//!
//! Usage:
//!   pomo start [-m MODE] [-s SIZE]   Run a session of SIZE pomodoros
//!   pomo stats                       Show the last 8 days as a bar chart
//!   pomo list                        List timing modes
//!   pomo add NAME [-w MIN ...]       Define a mode
//!   pomo edit NAME [-w MIN ...]      Change a mode
//!   pomo delete NAME                 Remove a mode

use anyhow::Result;
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use pomo::display::{paint, use_colors, TerminalDisplay};
use pomo::graph;
use pomo::mode::{Mode, ModeRegistry, ModeUpdate};
use pomo::runner::{SessionOutcome, SessionRunner, SystemClock};
use pomo::session::{Session, SessionEngine, MAX_SESSION_SIZE};
use pomo::stats::StatsStore;
use pomo_core::{format, Config, Paths};
use pomo_notify::{Backend, DesktopNotifier, NotificationSink, Silent};

/// Pomo - Pomodoro timer in the terminal
#[derive(Parser)]
#[command(name = "pomo")]
#[command(about = "Pomodoro timer in the terminal with named modes and weekly stats")]
#[command(version)]
#[command(after_help = r#"EXAMPLES:
    pomo start                      # 5 pomodoros in the default mode
    pomo start -m deep -s 3         # 3 pomodoros in mode "deep"
    pomo add deep -w 90 -b 20 -l 30 -f 2
    pomo add short -w 15            # other fields default to 5/15/4
    pomo edit deep -w 75
    pomo stats                      # last 8 days

FILES:
    modes.json and stats.json live in the pomo data directory,
    config.json in the pomo config directory. Set POMO_HOME or
    --data-dir to keep all three in one place.

LOGGING:
    RUST_LOG=debug pomo start
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// List timing modes
    #[arg(short = 'l', long)]
    list_modes: bool,

    /// Directory for modes, stats and config
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a session with the chosen mode and size
    #[command(alias = "s")]
    Start {
        /// Mode to run (default: config default_mode)
        #[arg(short, long)]
        mode: Option<String>,

        /// Number of pomodoros in the session
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_SESSION_SIZE as i64))]
        session_size: Option<u32>,

        /// Text shown when work starts
        #[arg(short, long)]
        work_label: Option<String>,

        /// Text shown when a break starts
        #[arg(short, long)]
        break_label: Option<String>,

        /// Don't send desktop notifications
        #[arg(long)]
        no_notify: bool,
    },

    /// Show completed pomodoros for the last 8 days
    #[command(alias = "statistics")]
    Stats,

    /// List timing modes
    #[command(alias = "list-modes", alias = "ls")]
    List,

    /// Add a timing mode
    Add {
        /// Mode name
        name: String,

        /// Work interval in minutes
        #[arg(short = 'w', long = "work", default_value_t = DEFAULT_WORK, value_parser = clap::value_parser!(u32).range(1..))]
        work_time: u32,

        /// Break in minutes
        #[arg(short = 'b', long = "break", default_value_t = DEFAULT_BREAK, value_parser = clap::value_parser!(u32).range(1..))]
        break_time: u32,

        /// Long break in minutes
        #[arg(short = 'l', long = "long-break", default_value_t = DEFAULT_LONG_BREAK, value_parser = clap::value_parser!(u32).range(1..))]
        long_break_time: u32,

        /// Every Nth break is long
        #[arg(short = 'f', long = "freq", default_value_t = DEFAULT_FREQ, value_parser = clap::value_parser!(u32).range(1..))]
        long_break_freq: u32,
    },

    /// Delete a timing mode
    #[command(alias = "rm")]
    Delete {
        /// Mode name
        name: String,
    },

    /// Change fields of a timing mode
    Edit {
        /// Mode name
        name: String,

        /// Work interval in minutes
        #[arg(short = 'w', long = "work", value_parser = clap::value_parser!(u32).range(1..))]
        work_time: Option<u32>,

        /// Break in minutes
        #[arg(short = 'b', long = "break", value_parser = clap::value_parser!(u32).range(1..))]
        break_time: Option<u32>,

        /// Long break in minutes
        #[arg(short = 'l', long = "long-break", value_parser = clap::value_parser!(u32).range(1..))]
        long_break_time: Option<u32>,

        /// Every Nth break is long
        #[arg(short = 'f', long = "freq", value_parser = clap::value_parser!(u32).range(1..))]
        long_break_freq: Option<u32>,
    },
}

const DEFAULT_WORK: u32 = Mode::DEFAULT.work_time;
const DEFAULT_BREAK: u32 = Mode::DEFAULT.break_time;
const DEFAULT_LONG_BREAK: u32 = Mode::DEFAULT.long_break_time;
const DEFAULT_FREQ: u32 = Mode::DEFAULT.long_break_freq;

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const BOLD: &str = "\x1b[1m";

/// Exit status after SIGINT/SIGTERM
const EXIT_INTERRUPTED: i32 = 130;

fn color(code: &str, text: &str) -> String {
    paint(use_colors(), code, text)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = match &cli.data_dir {
        Some(dir) => Paths::with_root(dir),
        None => Paths::new(),
    };
    paths.ensure()?;
    let config = Config::load(&paths.config_file())?;

    if cli.list_modes && cli.command.is_none() {
        return cmd_list(&paths);
    }

    match cli.command {
        Some(Commands::Start {
            mode,
            session_size,
            work_label,
            break_label,
            no_notify,
        }) => cmd_start(
            &paths,
            &config,
            StartArgs {
                mode,
                session_size,
                work_label,
                break_label,
                no_notify,
            },
        ),
        Some(Commands::Stats) => cmd_stats(&paths),
        Some(Commands::List) => cmd_list(&paths),
        Some(Commands::Add {
            name,
            work_time,
            break_time,
            long_break_time,
            long_break_freq,
        }) => cmd_add(
            &paths,
            &name,
            Mode {
                work_time,
                break_time,
                long_break_time,
                long_break_freq,
            },
        ),
        Some(Commands::Delete { name }) => cmd_delete(&paths, &name),
        Some(Commands::Edit {
            name,
            work_time,
            break_time,
            long_break_time,
            long_break_freq,
        }) => cmd_edit(
            &paths,
            &name,
            ModeUpdate {
                work_time,
                break_time,
                long_break_time,
                long_break_freq,
            },
        ),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

struct StartArgs {
    mode: Option<String>,
    session_size: Option<u32>,
    work_label: Option<String>,
    break_label: Option<String>,
    no_notify: bool,
}

/// Run a session in the foreground
fn cmd_start(paths: &Paths, config: &Config, args: StartArgs) -> Result<()> {
    let registry = ModeRegistry::open(&paths.modes_file())?;
    let mode_name = args.mode.unwrap_or_else(|| config.default_mode.clone());
    let mode = registry.get(&mode_name)?;

    let session = Session::new(
        mode_name.clone(),
        mode,
        args.session_size.unwrap_or(config.session_size),
        args.work_label.unwrap_or_else(|| config.work_label.clone()),
        args.break_label.unwrap_or_else(|| config.break_label.clone()),
    );
    let size = session.size;
    let total_minutes = (session.total_secs() / 60) as u32;
    let engine = SessionEngine::new(session)?;

    let mut store = StatsStore::open(&paths.stats_file())?;

    let cancel = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&cancel))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&cancel))?;

    let notifier: Box<dyn NotificationSink> = if args.no_notify || !config.notifications {
        Box::new(Silent)
    } else {
        match &config.notify_command {
            Some(program) => Box::new(DesktopNotifier::with_backend(Backend::Custom(
                program.clone(),
            ))),
            None => Box::new(DesktopNotifier::new()),
        }
    };

    println!(
        "{}",
        color(
            GREEN,
            &format!(
                "Pomodoro timer with mode {} and session size {} pomodoros launched!",
                mode_name, size
            )
        )
    );
    println!(
        "  {} {}",
        color(CYAN, "Total:"),
        format::minutes(total_minutes)
    );

    let mut clock = SystemClock;
    let mut display = TerminalDisplay::stdout(size);
    let outcome = SessionRunner::new(
        engine,
        &mut clock,
        &mut display,
        notifier.as_ref(),
        &mut store,
    )
    .with_cancel_flag(cancel)
    .run();

    if let SessionOutcome::Interrupted { .. } = outcome {
        std::process::exit(EXIT_INTERRUPTED);
    }

    Ok(())
}

/// Show the weekly chart
fn cmd_stats(paths: &Paths) -> Result<()> {
    let store = StatsStore::open(&paths.stats_file())?;
    let record = store.load();
    let now = Local::now();
    let week = graph::window(now.date_naive());

    println!("{}", color(BOLD, "Pomodoros (last 8 days)"));
    println!();
    print!("{}", graph::render(&record, &now));
    println!();
    println!(
        "  {}       {}",
        color(CYAN, "Today:"),
        record.count_on(now.date_naive())
    );
    println!("  {} {}", color(CYAN, "Last 8 days:"), record.total_over(&week));

    Ok(())
}

/// Print every mode with its fields
fn cmd_list(paths: &Paths) -> Result<()> {
    let registry = ModeRegistry::open(&paths.modes_file())?;
    let modes = registry.load()?;

    if modes.is_empty() {
        println!("No modes defined");
        println!();
        println!("Add one with: pomo add NAME -w 20 -b 5 -l 15 -f 4");
        return Ok(());
    }

    for (name, mode) in &modes {
        println!("{}", color(GREEN, &format!("{}:", name)));
        for (field, value) in mode.fields() {
            println!("\t{}: {}", field, value);
        }
    }

    Ok(())
}

fn cmd_add(paths: &Paths, name: &str, mode: Mode) -> Result<()> {
    let registry = ModeRegistry::open(&paths.modes_file())?;
    registry.add(name, mode)?;
    println!("{} Mode {} added", color(GREEN, "[ok]"), name);
    Ok(())
}

fn cmd_delete(paths: &Paths, name: &str) -> Result<()> {
    let registry = ModeRegistry::open(&paths.modes_file())?;
    registry.delete(name)?;
    println!("{} Mode {} deleted", color(GREEN, "[ok]"), name);
    Ok(())
}

fn cmd_edit(paths: &Paths, name: &str, update: ModeUpdate) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one of -w, -b, -l, -f");
    }

    let registry = ModeRegistry::open(&paths.modes_file())?;
    let mode = registry.edit(name, update)?;

    println!("{} Mode {} updated", color(GREEN, "[ok]"), name);
    for (field, value) in mode.fields() {
        println!("\t{}: {}", field, value);
    }
    Ok(())
}
