mod color;
mod config;
mod matcher;
mod palette;
mod report;
mod storage;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::matcher::{EmptyReason, QueryFilters};
use crate::palette::{Palette, PaletteSet};
use crate::storage::{PaletteStore, SqliteStore};

#[derive(Debug, Parser)]
#[command(
    name = "swatch",
    version,
    about = "Find the closest colors across your marker and pen palettes"
)]
struct Cli {
    /// Override config file path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Palette dataset (JSON) to use instead of the configured one.
    #[arg(long, global = true)]
    palettes: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find the closest palette colors to a hex color.
    Find {
        /// Hex color: #RGB or #RRGGBB.
        color: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Find matches for the color at a palette cell (e.g. "Fineliner 12" B2).
    Pick {
        palette: String,
        /// Cell reference: column letter + row number.
        cell: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print palettes with their grids.
    List {
        /// Only owned palettes.
        #[arg(long)]
        owned: bool,
    },
    /// Mark palettes as owned.
    Own {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Unmark palettes as owned.
    Disown {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Flip a palette's owned mark.
    Toggle { name: String },
    /// Mark every palette as owned.
    MarkAll,
    /// Clear every owned mark.
    UnmarkAll,
    /// Show or change the config file.
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Drop all colors from the palette containing the best match.
    #[arg(long)]
    exclude_best: bool,

    /// Keep only the closest color of each palette.
    #[arg(long)]
    one_per_palette: bool,

    /// Search owned palettes only (remembered for later runs).
    #[arg(long, conflicts_with = "all_palettes")]
    only_owned: bool,

    /// Search all palettes (remembered for later runs).
    #[arg(long)]
    all_palettes: bool,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective config and its location.
    Show,
    /// Use a JSON palette dataset by default.
    SetPalettes { file: PathBuf },
    /// Go back to the built-in palette dataset.
    ClearPalettes,
}

fn main() -> anyhow::Result<ExitCode> {
    let Cli {
        config: config_override,
        palettes: palettes_override,
        verbose,
        command,
    } = Cli::parse();

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = config::load(config_override.as_deref()).context("load config")?;

    let command = match command {
        Command::Config { cmd } => {
            run_config(cmd, cfg, config_override)?;
            return Ok(ExitCode::SUCCESS);
        }
        other => other,
    };

    let dataset = palettes_override.as_deref().or(cfg.palettes.file.as_deref());
    let palettes = match dataset {
        Some(path) => PaletteSet::load(path).context("load palettes")?,
        None => PaletteSet::builtin(),
    };
    let mut store = PaletteStore::new(palettes, SqliteStore::new(cfg.database_path()));

    match command {
        Command::Find { color, filters } => {
            return run_search(&store, &color, &filters, &cfg);
        }
        Command::Pick {
            palette,
            cell,
            filters,
        } => {
            let color = store
                .palettes()
                .cell(&palette, &cell)
                .with_context(|| format!("look up {palette} {cell}"))?;
            if !filters.json {
                println!("Picked {color} from {palette} {}", cell.to_ascii_uppercase());
            }
            return run_search(&store, &color.to_hex(), &filters, &cfg);
        }
        Command::List { owned } => {
            let shown: Vec<&Palette> = if owned {
                store
                    .owned_names()
                    .into_iter()
                    .filter_map(|name| store.palettes().get(name))
                    .collect()
            } else {
                store.list_palettes().iter().collect()
            };
            if store.palettes().is_empty() {
                println!("The palette dataset is empty.");
            } else if shown.is_empty() {
                println!("No palettes are marked as owned.");
            }
            for (i, p) in shown.into_iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", report::render_palette(p, store.is_owned(p.name())));
            }
        }
        Command::Own { names } => {
            for name in &names {
                warn_unknown(&store, name);
                store.set_owned(name, true);
            }
            println!("Marked {} palette(s) as owned.", names.len());
        }
        Command::Disown { names } => {
            for name in &names {
                warn_unknown(&store, name);
                store.set_owned(name, false);
            }
            println!("Unmarked {} palette(s).", names.len());
        }
        Command::Toggle { name } => {
            warn_unknown(&store, &name);
            let owned = store.toggle_owned(&name);
            println!(
                "{name}: {}",
                if owned { "owned" } else { "not owned" }
            );
        }
        Command::MarkAll => {
            store.mark_all(true);
            println!("Marked all {} palettes as owned.", store.palettes().len());
        }
        Command::UnmarkAll => {
            store.mark_all(false);
            println!("Cleared all owned marks.");
        }
        // Handled before the store is opened.
        Command::Config { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}

fn run_search(
    store: &PaletteStore<SqliteStore>,
    input: &str,
    args: &FilterArgs,
    cfg: &config::Config,
) -> anyhow::Result<ExitCode> {
    let only_owned = if args.only_owned || args.all_palettes {
        store.set_only_owned_filter(args.only_owned);
        args.only_owned
    } else {
        store.only_owned_filter()
    };

    let filters = QueryFilters {
        exclude_same_as_best: args.exclude_best,
        limit_one_per_palette: args.one_per_palette,
        only_owned,
    };
    let outcome = matcher::search(store, input, filters);

    if args.json {
        println!("{}", report::render_json(&outcome, &cfg.display)?);
    } else if outcome.empty_reason() == Some(EmptyReason::InvalidInput) {
        eprint!("{}", report::render_text(&outcome, &cfg.display));
    } else {
        print!("{}", report::render_text(&outcome, &cfg.display));
    }

    Ok(match outcome.empty_reason() {
        Some(EmptyReason::InvalidInput) => ExitCode::from(2),
        _ => ExitCode::SUCCESS,
    })
}

fn warn_unknown(store: &PaletteStore<SqliteStore>, name: &str) {
    if !store.palettes().contains(name) {
        eprintln!("warning: no palette named {name:?} in the current dataset");
    }
}

fn run_config(
    cmd: ConfigCommand,
    cfg: config::Config,
    override_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let cfg_path = match override_path {
        Some(p) => p,
        None => config::default_config_path().context("default config path")?,
    };

    match cmd {
        ConfigCommand::Show => {
            println!("# {}", cfg_path.display());
            print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
        }
        ConfigCommand::SetPalettes { file } => {
            let file = std::fs::canonicalize(&file)
                .with_context(|| format!("resolve {}", file.display()))?;
            let set = PaletteSet::load(&file)?;
            let mut cfg = cfg;
            cfg.palettes.file = Some(file);
            config::save(&cfg, Some(cfg_path.as_path())).context("save config")?;
            println!("Using {} palettes from the configured dataset.", set.len());
        }
        ConfigCommand::ClearPalettes => {
            let mut cfg = cfg;
            cfg.palettes.file = None;
            config::save(&cfg, Some(cfg_path.as_path())).context("save config")?;
            println!("Using the built-in palette dataset.");
        }
    }
    Ok(())
}
