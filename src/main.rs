//! Date Range Picker - command-line entry point
//!
//! Drives a picker session backed by the on-disk state file, so the last
//! selection is remembered between invocations.

use chrono::{DateTime, Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use date_range_picker::{
    compute_derived,
    config::Config,
    display,
    error::{Error, Result},
    FileStore, PickerSession, Preset, SelectionState, SelectionStore,
};

#[derive(Parser)]
#[command(name = "date-range")]
#[command(author, version, about = "Resolve and validate date-range presets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Evaluate at this RFC 3339 instant instead of the current time
    #[arg(long, global = true, env = "DATE_RANGE_NOW")]
    now: Option<String>,

    /// Reject ranges that end after the current time
    #[arg(long, global = true)]
    disallow_future: bool,

    /// Reject ranges longer than this many days
    #[arg(long, global = true)]
    max_window_days: Option<u32>,

    /// Emit applied instants with the local offset instead of UTC
    #[arg(long, global = true)]
    local_offset: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current selection and its resolved range
    Show,

    /// List every preset resolved at the evaluation instant
    Presets,

    /// Select a preset (today, yesterday, last7, last30, thisMonth, lastMonth, custom)
    Preset {
        /// Preset token
        preset: Preset,
    },

    /// Select explicit start and end dates
    Custom {
        /// First day of the range (YYYY-MM-DD)
        #[arg(long, value_parser = parse_civil_date)]
        start: Option<NaiveDate>,

        /// Last day of the range (YYYY-MM-DD)
        #[arg(long, value_parser = parse_civil_date)]
        end: Option<NaiveDate>,

        /// Forget previously entered custom dates first
        #[arg(long)]
        clear: bool,
    },

    /// Print the range payload if the selection is valid
    Apply {
        /// Pretty-print the JSON payload
        #[arg(long)]
        pretty: bool,
    },

    /// Go back to the default selection
    Reset {
        /// Delete the saved selection instead of saving the default
        #[arg(long)]
        forget: bool,
    },

    /// Show or edit configuration
    Config {
        /// Print current configuration
        #[arg(long)]
        show: bool,

        /// Create default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn parse_civil_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, date_range_picker::selection::CIVIL_DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

fn evaluation_instant(now: Option<&str>) -> Result<DateTime<Local>> {
    now.map_or_else(
        || Ok(Local::now()),
        |text| {
            DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Local))
                .map_err(|_| Error::InvalidInstant(text.to_string()))
        },
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration, then apply CLI overrides
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };
    if cli.disallow_future {
        config.policy.disallow_future = true;
    }
    if cli.max_window_days.is_some() {
        config.policy.max_window_days = cli.max_window_days;
    }
    if cli.local_offset {
        config.output.utc = false;
    }
    config.validate()?;

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(&config.general.log_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let now = evaluation_instant(cli.now.as_deref())?;

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Config { show, init } => run_config(&config, show, init),

        Commands::Show => {
            let session = open_session(&config)?;
            print_state(&session, &now);
            Ok(())
        }

        Commands::Preset { preset } => {
            let mut session = open_session(&config)?;
            tracing::info!("Selecting preset {preset}");
            session.set_preset(preset, &now);
            print_state(&session, &now);
            Ok(())
        }

        Commands::Custom { start, end, clear } => {
            let mut session = open_session(&config)?;
            let current = *session.selection();
            let (start, end) = if clear {
                (start, end)
            } else {
                (start.or(current.custom_start), end.or(current.custom_end))
            };
            tracing::info!("Selecting custom range");
            session.set_custom_range(start, end, &now);
            print_state(&session, &now);
            Ok(())
        }

        Commands::Apply { pretty } => run_apply(&open_session(&config)?, &now, pretty),

        Commands::Reset { forget } => {
            let mut session = open_session(&config)?;
            if forget {
                session.forget()?;
                println!("Saved selection removed");
            } else {
                session.reset(&now);
                println!("Selection reset to {}", Preset::default().display_name());
            }
            Ok(())
        }

        Commands::Presets => {
            let session = open_session(&config)?;
            let selection = *session.selection();
            let resolved: Vec<_> = Preset::all()
                .iter()
                .map(|preset| {
                    let candidate = SelectionState {
                        preset: *preset,
                        ..selection
                    };
                    (*preset, compute_derived(&candidate, session.policy(), &now))
                })
                .collect();
            display::print_section("PRESETS");
            display::display_presets(&resolved, selection.preset);
            Ok(())
        }
    }
}

/// Start a session on the configured state file.
fn open_session(config: &Config) -> Result<PickerSession<FileStore>> {
    let state_path = config.state_path()?;
    tracing::debug!("Using state file {}", state_path.display());

    let store = SelectionStore::new(FileStore::new(state_path), config.storage.key.clone());
    Ok(PickerSession::start(store, config.policy).with_utc_output(config.output.utc))
}

fn print_state(session: &PickerSession<FileStore>, now: &DateTime<Local>) {
    display::print_section("DATE RANGE");

    display::print_section_simple("SELECTION");
    display::display_selection(session.selection(), session.origin());

    display::print_section_simple("RANGE");
    display::display_derived(&session.derived(now), session.policy());

    if let Some(hint) = display::input_cap_hint(session.policy(), now) {
        println!("\n  ({hint})");
    }
    println!();
}

fn run_apply(session: &PickerSession<FileStore>, now: &DateTime<Local>, pretty: bool) -> Result<()> {
    let mut payload = None;
    if !session.apply(now, |p| payload = Some(p)) {
        let derived = session.derived(now);
        if derived.is_unresolved() {
            eprintln!("Pick both a start and an end date before applying.");
        }
        for message in derived.outcome.messages() {
            eprintln!("{message}");
        }
        return Err(Error::other("selection cannot be applied"));
    }

    let Some(payload) = payload else {
        return Err(Error::other("selection cannot be applied"));
    };
    let json = if pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    println!("{json}");
    Ok(())
}

fn run_config(config: &Config, show: bool, init: bool) -> Result<()> {
    if init {
        let default_config = Config::default();
        default_config.save()?;
        println!(
            "Created default configuration at {}",
            Config::config_path()?.display()
        );
    } else if show {
        let contents = toml::to_string_pretty(config)?;
        println!("{contents}");
    } else {
        println!("Configuration path: {}", Config::config_path()?.display());
    }
    Ok(())
}
