//! causalkg CLI: build the causal graph and query it.
//!
//! Usage:
//!   causalkg build <INPUT_DIRS>... [--config path] [--db path]
//!   causalkg interaction <SOURCE> <DESTINATION> [--bidirectional]
//!   causalkg neighbors <FOCAL>

use causalkg::build::{load_doi_map, read_uniprot, DocumentResolver, ImpactFactors};
use causalkg::storage::DEFAULT_GRAPH;
use causalkg::{
    query, Config, EntityId, GraphBuilder, GraphEngine, GraphStore, OpenStore, Polarity,
    SqliteStore,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "causalkg",
    version,
    about = "Causal knowledge graph builder and subgraph query engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Name of the stored graph
    #[arg(long, global = true, default_value = DEFAULT_GRAPH)]
    graph: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph from extraction files and store it
    Build {
        /// Directories containing *.tsv extraction files
        #[arg(required = true)]
        input_dirs: Vec<PathBuf>,
        /// UniProt FASTA file used for protein descriptions
        #[arg(long)]
        uniprot: Option<PathBuf>,
        /// Impact-factor tables (JSON)
        #[arg(long)]
        impact_factors: Option<PathBuf>,
        /// xDD bibliography export (JSON)
        #[arg(long)]
        bibliography: Option<PathBuf>,
        /// DOI to PMCID mapping (CSV)
        #[arg(long)]
        pmcid_map: Option<PathBuf>,
        /// Also write the built graph as JSON
        #[arg(long)]
        export_json: Option<PathBuf>,
    },
    /// Subgraph connecting two entities
    Interaction {
        source: String,
        destination: String,
        /// Include every edge among the path's nodes
        #[arg(long)]
        bidirectional: bool,
    },
    /// Most frequent edges incident to an entity
    Neighbors { focal: String },
    /// Reciprocals, influenced entities and influencers of an entity
    Overview { focal: String },
    /// Evidence sentences for one directed relation
    Evidence {
        source: String,
        target: String,
        /// positive, negative or neutral
        polarity: Polarity,
    },
    /// Entities whose label or id contains a term
    Entities {
        #[arg(default_value = "")]
        term: String,
    },
    /// Observed descriptions of an entity
    Synonyms { id: String },
}

/// Get the default database path (~/.local/share/causalkg/causalkg.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("causalkg").join("causalkg.db")
}

fn open_store(db: Option<PathBuf>) -> Result<SqliteStore, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    SqliteStore::open(&db_path).map_err(|e| format!("Failed to open database: {}", e))
}

fn open_engine(db: Option<PathBuf>, graph: &str) -> Result<GraphEngine, String> {
    let store = open_store(db)?;
    let graph = store
        .require_graph(graph)
        .map_err(|e| format!("Failed to load graph: {}", e))?;
    Ok(GraphEngine::load(graph))
}

fn to_json(value: &impl Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize output: {}", e))
}

fn print_json(value: &impl Serialize) -> i32 {
    match to_json(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

struct BuildInputs {
    input_dirs: Vec<PathBuf>,
    uniprot: Option<PathBuf>,
    impact_factors: Option<PathBuf>,
    bibliography: Option<PathBuf>,
    pmcid_map: Option<PathBuf>,
    export_json: Option<PathBuf>,
}

/// Build, store and optionally export the graph; returns the build report as JSON
fn run_build(config: &Config, store: &SqliteStore, name: &str, inputs: &BuildInputs) -> Result<String, String> {
    let mut documents = DocumentResolver::new().map_err(|e| e.to_string())?;
    if let Some(path) = &inputs.bibliography {
        let bibliography = documents
            .load_bibliography(path)
            .map_err(|e| format!("Failed to read bibliography: {}", e))?;
        documents = documents.with_bibliography(bibliography);
    }
    if let Some(path) = &inputs.pmcid_map {
        let map = load_doi_map(path).map_err(|e| format!("Failed to read PMCID map: {}", e))?;
        documents = documents.with_doi_map(map);
    }

    let mut builder = GraphBuilder::new(config.build.clone())
        .map_err(|e| e.to_string())?
        .with_documents(documents);
    if let Some(path) = &inputs.impact_factors {
        let factors = ImpactFactors::load(path)
            .map_err(|e| format!("Failed to read impact factors: {}", e))?
            .with_metric(config.build.impact_metric);
        builder = builder.with_impact(factors);
    }
    if let Some(path) = &inputs.uniprot {
        let uniprot = read_uniprot(path).map_err(|e| format!("Failed to read UniProt file: {}", e))?;
        builder = builder.with_uniprot(uniprot);
    }

    let rows = builder
        .read_dirs(&inputs.input_dirs)
        .map_err(|e| format!("Failed to read extractions: {}", e))?;
    let output = builder.build(&rows);

    store
        .save_graph(name, &output.graph)
        .map_err(|e| format!("Failed to save graph: {}", e))?;
    info!(graph = name, "graph stored");

    if let Some(path) = &inputs.export_json {
        export_json(&output.graph, path)?;
    }

    to_json(&output.report)
}

fn export_json(graph: &causalkg::CausalGraph, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string(graph).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| format!("cannot write '{}': {}", path.display(), e))?;
    info!(path = %path.display(), "graph exported");
    Ok(())
}

fn cmd_query(engine: &GraphEngine, config: &Config, command: Commands) -> i32 {
    match command {
        Commands::Interaction {
            source,
            destination,
            bidirectional,
        } => {
            let result = query::interaction(
                engine,
                &EntityId::from(source),
                &EntityId::from(destination),
                bidirectional,
                &config.query,
            );
            match result {
                Ok(graph) => print_json(&graph),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            }
        }
        Commands::Neighbors { focal } => {
            print_json(&query::neighbors(engine, &EntityId::from(focal), &config.query))
        }
        Commands::Overview { focal } => print_json(&query::overview(engine, &EntityId::from(focal))),
        Commands::Evidence {
            source,
            target,
            polarity,
        } => print_json(&query::evidence(
            engine,
            &EntityId::from(source),
            &EntityId::from(target),
            polarity,
        )),
        Commands::Entities { term } => print_json(&query::entities(engine, &term)),
        Commands::Synonyms { id } => print_json(&query::synonyms(engine, &EntityId::from(id))),
        Commands::Build { .. } => 1,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Build {
            input_dirs,
            uniprot,
            impact_factors,
            bibliography,
            pmcid_map,
            export_json,
        } => {
            let inputs = BuildInputs {
                input_dirs,
                uniprot,
                impact_factors,
                bibliography,
                pmcid_map,
                export_json,
            };
            match open_store(cli.db).and_then(|store| run_build(&config, &store, &cli.graph, &inputs)) {
                Ok(report) => {
                    println!("{}", report);
                    0
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            }
        }
        command => match open_engine(cli.db, &cli.graph) {
            Ok(engine) => cmd_query(&engine, &config, command),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
    };
    std::process::exit(code);
}
