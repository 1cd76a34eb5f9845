#![forbid(unsafe_code)]

use clap::{Args, Parser, Subcommand, ValueEnum};
use mirador_core::{ExitCode, MachineError, ENV_MIRADOR_GEMINI_API_KEY, ENV_MIRADOR_LOG};
use mirador_ingest::{load_tables, SourceEncoding, SourceSet};
use mirador_map::{hazard_layer, tourism_layer, MapDocument};
use mirador_model::{
    drop_invalid, EventType, FilterDomains, FilterState, Tables, DEFAULT_DEATH_TYPE,
    DEFAULT_EVENT_TYPE, DEFAULT_PROVINCE,
};
use mirador_query::{events_by_province_and_canton, homicides_by_weapon_and_sex};
use serde_json::json;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod repl;

#[derive(Parser)]
#[command(name = "mirador")]
#[command(about = "Mirador tourism-safety exploration CLI")]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the three datasets and report row and drop counts.
    Validate {
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// Print the distinct values of one filter axis.
    Distinct {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(long, value_enum)]
        column: ColumnAxis,
    },
    Chart {
        #[command(subcommand)]
        command: ChartCommand,
    },
    Map {
        #[command(subcommand)]
        command: MapCommand,
    },
    /// Interactive SafeGuide session.
    Chat,
}

#[derive(Subcommand)]
enum ChartCommand {
    /// Grouped weapon/sex counts for one province and death type.
    Homicides {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(long)]
        province: Option<String>,
        #[arg(long = "death-type")]
        death_type: Option<String>,
    },
    /// Grouped province/canton counts for one event type.
    Events {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(long = "event-type")]
        event_type: Option<String>,
    },
}

#[derive(Subcommand)]
enum MapCommand {
    Tourism {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long = "data-uri", default_value_t = false)]
        data_uri: bool,
    },
    Hazards {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long = "data-uri", default_value_t = false)]
        data_uri: bool,
    },
}

#[derive(Args)]
struct SourceArgs {
    #[arg(long)]
    homicides: PathBuf,
    #[arg(long)]
    tourism: PathBuf,
    #[arg(long)]
    hazards: PathBuf,
    /// Read all three sources as UTF-8 instead of the published Latin-1.
    #[arg(long, default_value_t = false)]
    utf8: bool,
}

impl SourceArgs {
    fn source_set(&self) -> SourceSet {
        let mut sources = SourceSet::with_default_formats(
            self.homicides.clone(),
            self.tourism.clone(),
            self.hazards.clone(),
        );
        if self.utf8 {
            sources.homicides.encoding = SourceEncoding::Utf8;
            sources.tourism.encoding = SourceEncoding::Utf8;
            sources.hazards.encoding = SourceEncoding::Utf8;
        }
        sources
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColumnAxis {
    Province,
    DeathType,
    EventType,
}

struct CliError {
    exit: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn validation(message: &str) -> Self {
        Self {
            exit: ExitCode::Validation,
            machine: MachineError::new("validation_failed", message),
        }
    }

    fn dependency(message: &str) -> Self {
        Self {
            exit: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", message),
        }
    }

    fn internal(message: &str) -> Self {
        Self {
            exit: ExitCode::Internal,
            machine: MachineError::new("internal_error", message),
        }
    }
}

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    if !cli.quiet {
        tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_env(ENV_MIRADOR_LOG)
                    .unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let json = cli.json;
    match run(cli) {
        Ok(()) => ProcessExitCode::SUCCESS,
        Err(err) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string(&err.machine)
                        .unwrap_or_else(|_| err.machine.to_string())
                );
            } else {
                eprintln!("error: {}", err.machine.message);
            }
            ProcessExitCode::from(err.exit as u8)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Validate { sources } => validate(&sources, cli.json),
        Commands::Distinct { sources, column } => distinct(&sources, column, cli.json),
        Commands::Chart { command } => match command {
            ChartCommand::Homicides {
                sources,
                province,
                death_type,
            } => chart_homicides(&sources, province, death_type, cli.json),
            ChartCommand::Events {
                sources,
                event_type,
            } => chart_events(&sources, event_type, cli.json),
        },
        Commands::Map { command } => match command {
            MapCommand::Tourism {
                sources,
                out,
                data_uri,
            } => build_map(&sources, MapKind::Tourism, out, data_uri),
            MapCommand::Hazards {
                sources,
                out,
                data_uri,
            } => build_map(&sources, MapKind::Hazards, out, data_uri),
        },
        Commands::Chat => chat(),
    }
}

fn loaded_tables(sources: &SourceArgs) -> Result<(Tables, mirador_ingest::IngestLog), CliError> {
    load_tables(&sources.source_set()).map_err(|e| CliError::validation(&e.0))
}

fn validate(sources: &SourceArgs, json: bool) -> Result<(), CliError> {
    let (tables, log) = loaded_tables(sources)?;
    if json {
        let value = json!({
            "homicides": tables.homicides.len(),
            "tourism": tables.tourism.len(),
            "hazards": tables.hazards.len(),
            "dropped_rows": log.dropped_rows(),
        });
        println!("{value}");
    } else {
        println!(
            "datasets valid: {} homicides, {} tourism sites, {} hazard events ({} rows dropped)",
            tables.homicides.len(),
            tables.tourism.len(),
            tables.hazards.len(),
            log.dropped_rows()
        );
    }
    Ok(())
}

fn distinct(sources: &SourceArgs, column: ColumnAxis, json: bool) -> Result<(), CliError> {
    let (tables, _) = loaded_tables(sources)?;
    let domains = FilterDomains::from_tables(&tables);
    let values = match column {
        ColumnAxis::Province => &domains.provinces,
        ColumnAxis::DeathType => &domains.death_types,
        ColumnAxis::EventType => &domains.event_types,
    };
    if json {
        println!(
            "{}",
            serde_json::to_string(values).map_err(|e| CliError::internal(&e.to_string()))?
        );
    } else {
        for value in values {
            println!("{value}");
        }
    }
    Ok(())
}

fn chart_homicides(
    sources: &SourceArgs,
    province: Option<String>,
    death_type: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let (tables, _) = loaded_tables(sources)?;
    let domains = FilterDomains::from_tables(&tables);
    let state = FilterState::new(
        province.as_deref().unwrap_or(DEFAULT_PROVINCE),
        death_type.as_deref().unwrap_or(DEFAULT_DEATH_TYPE),
        &domains,
    )
    .map_err(|e| CliError::validation(&e.to_string()))?;

    let chart = homicides_by_weapon_and_sex(&tables, &state);
    if json {
        let mut value =
            serde_json::to_value(&chart).map_err(|e| CliError::internal(&e.to_string()))?;
        value["total"] = json!(chart.total());
        println!("{value}");
    } else {
        println!("{}", chart.title);
        for group in &chart.groups {
            println!("{} / {}: {}", group.weapon, group.sex, group.count);
        }
        println!("total: {}", chart.total());
    }
    Ok(())
}

fn chart_events(
    sources: &SourceArgs,
    event_type: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let (tables, _) = loaded_tables(sources)?;
    let domains = FilterDomains::from_tables(&tables);
    let selected = EventType::parse(
        event_type.as_deref().unwrap_or(DEFAULT_EVENT_TYPE),
        &domains,
    )
    .map_err(|e| CliError::validation(&e.to_string()))?;

    let chart = events_by_province_and_canton(&tables, selected.as_str());
    if json {
        let mut value =
            serde_json::to_value(&chart).map_err(|e| CliError::internal(&e.to_string()))?;
        value["total"] = json!(chart.total());
        println!("{value}");
    } else {
        println!("{}", chart.title);
        for group in &chart.groups {
            println!("{} / {}: {}", group.province, group.canton, group.count);
        }
        println!("total: {}", chart.total());
    }
    Ok(())
}

enum MapKind {
    Tourism,
    Hazards,
}

fn build_map(
    sources: &SourceArgs,
    kind: MapKind,
    out: Option<PathBuf>,
    data_uri: bool,
) -> Result<(), CliError> {
    let (tables, _) = loaded_tables(sources)?;
    let document = match kind {
        MapKind::Tourism => MapDocument::new(
            "Atractivos Turísticos en Ecuador",
            vec![tourism_layer(drop_invalid(&tables.tourism))],
        ),
        MapKind::Hazards => MapDocument::new(
            "Eventos Peligrosos en Ecuador",
            vec![hazard_layer(drop_invalid(&tables.hazards))],
        ),
    };

    let rendered = if data_uri {
        document
            .to_data_uri()
            .map_err(|e| CliError::internal(&e.to_string()))?
    } else {
        let bytes = document
            .canonical_json()
            .map_err(|e| CliError::internal(&e.to_string()))?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    match out {
        Some(path) => std::fs::write(&path, rendered).map_err(|e| {
            CliError::internal(&format!("write {} failed: {e}", path.display()))
        })?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn chat() -> Result<(), CliError> {
    let api_key = env::var(ENV_MIRADOR_GEMINI_API_KEY)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            CliError::dependency(&format!(
                "required environment variable is not set: {ENV_MIRADOR_GEMINI_API_KEY}"
            ))
        })?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::internal(&e.to_string()))?;
    runtime
        .block_on(repl::run(api_key))
        .map_err(CliError::from)
}

impl From<repl::ReplError> for CliError {
    fn from(value: repl::ReplError) -> Self {
        match value {
            repl::ReplError::Assistant(message) => CliError::dependency(&message),
            repl::ReplError::Io(message) => CliError::internal(&message),
        }
    }
}
