//! Reno CLI - renovation project boards from a selection file
//!
//! Usage:
//!   reno init                      Write a default .reno/config.toml
//!   reno catalog [--area <AREA>]   List areas, or the scopes of one area
//!   reno plan <selection.json>     Synthesize and review a board plan
//!   reno create <selection.json>   Create the board remotely

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reno_client::{get_api_token, ApiClient, HttpEnhancer};
use reno_core::{BoardPlan, RenoConfig, Selection};
use reno_orchestrator::{BoardCreator, TracingSink};
use reno_planning::{Catalog, PlanSummary, StaticCatalog, SynthesisOptions, Synthesizer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "reno")]
#[command(author, version, about = "Renovation project board creator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Project directory holding .reno/config.toml
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration
    Init,

    /// Show the renovation catalogue
    Catalog {
        /// Only list the scopes of this area
        #[arg(long)]
        area: Option<String>,
    },

    /// Synthesize a board plan without touching the remote service
    Plan {
        /// Selection file (JSON)
        selection: PathBuf,

        /// Print the full plan as JSON
        #[arg(long)]
        json: bool,

        /// One item per scope instead of step breakdowns
        #[arg(long)]
        no_steps: bool,
    },

    /// Create the board remotely
    Create {
        /// Selection file (JSON)
        selection: PathBuf,

        /// Target workspace id
        #[arg(long)]
        workspace: Option<String>,

        /// One item per scope instead of step breakdowns
        #[arg(long)]
        no_steps: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init => cmd_init(&cli.root),
        Commands::Catalog { area } => cmd_catalog(area),
        Commands::Plan {
            selection,
            json,
            no_steps,
        } => cmd_plan(&cli.root, selection, json, no_steps).await,
        Commands::Create {
            selection,
            workspace,
            no_steps,
        } => cmd_create(&cli.root, selection, workspace, no_steps).await,
    }
}

fn cmd_init(root: &Path) -> Result<()> {
    let config_path = root.join(".reno/config.toml");
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    RenoConfig::write_default(root).context("Failed to write default config")?;
    println!("Initialized Reno in {}", root.display());
    println!("Created:");
    println!("  .reno/config.toml");
    println!();
    println!("Set RENO_API_TOKEN (or MONDAY_API_TOKEN) before running `reno create`.");
    Ok(())
}

fn cmd_catalog(area: Option<String>) -> Result<()> {
    let catalog = StaticCatalog::new();

    match area {
        Some(area) => {
            let Some(scopes) = catalog.scopes_for_area(&area) else {
                bail!("Unknown area '{}'. Run `reno catalog` to list areas.", area);
            };
            println!("{}:", area);
            for scope in scopes {
                match catalog.step_template(&area, &scope) {
                    Some(template) => println!("  {} ({} steps)", scope, template.steps.len()),
                    None => println!("  {}", scope),
                }
            }
        }
        None => {
            let fixed = catalog.fixed_task_lists();
            println!(
                "Every board starts with {} planning and {} permitting tasks.",
                fixed.planning.len(),
                fixed.permitting.len()
            );
            println!();
            println!("Areas:");
            for area in catalog.areas() {
                let count = catalog.scopes_for_area(&area).map_or(0, |s| s.len());
                println!("  {} ({} scopes)", area, count);
            }
        }
    }
    Ok(())
}

async fn cmd_plan(root: &Path, selection: PathBuf, json: bool, no_steps: bool) -> Result<()> {
    let config = load_config(root, no_steps)?;
    let plan = synthesize(&config, &selection).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", PlanSummary::of(&plan));
    }
    Ok(())
}

async fn cmd_create(
    root: &Path,
    selection: PathBuf,
    workspace: Option<String>,
    no_steps: bool,
) -> Result<()> {
    let config = load_config(root, no_steps)?;
    let mut plan = synthesize(&config, &selection).await?;
    print!("{}", PlanSummary::of(&plan));
    println!();

    let token = get_api_token(&config.api).context("No API token available")?;
    let client = ApiClient::from_config(&config, token)?;

    let mut creator = BoardCreator::new(client, config).with_sink(TracingSink);
    if let Some(workspace) = workspace {
        creator = creator.with_workspace(workspace);
    }

    let cancel = creator.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancellation requested; stopping at the next stage");
            cancel.cancel();
        }
    });

    let outcome = creator.run(&mut plan).await;
    let limiter = creator.client().rate_limit_status().await;
    debug!(?limiter, "Rate limiter status after run");

    match outcome {
        Ok(report) => {
            println!();
            println!("{}", report);
            Ok(())
        }
        Err(failure) => {
            eprintln!();
            eprintln!("Error: {}", failure.user_message());
            if let Some(board_id) = &failure.board_id {
                eprintln!(
                    "A partial board exists: {} ({})",
                    failure.board_url.as_deref().unwrap_or("no url"),
                    board_id
                );
            }
            if !failure.groups_created.is_empty() {
                eprintln!("Groups created: {}", failure.groups_created.join(", "));
            }
            Err(failure.into())
        }
    }
}

fn load_config(root: &Path, no_steps: bool) -> Result<RenoConfig> {
    let mut config = RenoConfig::load_or_default(root).context("Failed to load config")?;
    if no_steps {
        config.creation.step_breakdowns = false;
    }
    Ok(config)
}

async fn synthesize(config: &RenoConfig, path: &Path) -> Result<BoardPlan> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read selection file {}", path.display()))?;
    let selection: Selection = serde_json::from_str(&content)
        .with_context(|| format!("Invalid selection file {}", path.display()))?;

    let enhancer = HttpEnhancer::from_config(&config.enhancement)?;
    let synthesizer = Synthesizer::new(
        Arc::new(StaticCatalog::new()),
        Arc::new(enhancer),
        SynthesisOptions::from(config),
    );

    info!(
        project = %selection.project_name,
        areas = selection.areas.len(),
        scopes = selection.scope_count(),
        "Synthesizing board plan"
    );
    let plan = synthesizer.synthesize(&selection).await?;
    Ok(plan)
}
