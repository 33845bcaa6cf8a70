//! epinet - R0 estimation on contact networks
//!
//! Runs Monte-Carlo SIR trials on a fixture or loaded contact network and
//! reports the distribution of direct secondary infections.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use epinet_logging::{EpinetSubscriberBuilder, FileConfig, LogConfig};
use epinet_simulation::{
    ContactGraph, ContactNetwork, EstimatorConfig, R0Estimator, R0Summary, TopologyBuilder,
    load_edge_list, scenarios,
};

#[derive(Parser)]
#[command(
    name = "epinet",
    about = "Monte-Carlo estimation of R0 for SIR epidemics on contact networks",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Console log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Also write JSONL logs into this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate R0 on a contact network
    Estimate {
        #[command(flatten)]
        graph: GraphArgs,

        /// TOML run configuration; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Per-step transmission probability along an edge
        #[arg(short, long)]
        beta: Option<f64>,

        /// Per-step recovery probability
        #[arg(short, long)]
        gamma: Option<f64>,

        /// Number of trials
        #[arg(short = 'n', long)]
        trials: Option<usize>,

        /// Master seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Run trials in parallel
        #[arg(short, long)]
        parallel: bool,

        /// Worker threads for parallel runs
        #[arg(long)]
        threads: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a pre-defined scenario
    Scenario {
        #[arg(value_enum)]
        name: ScenarioName,

        /// Seed for the scenario's random stream
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Trials per run, where the scenario runs the estimator
        #[arg(short = 'n', long, default_value = "100")]
        trials: usize,
    },

    /// Build or load a contact network and describe it
    Topology {
        #[command(flatten)]
        graph: GraphArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScenarioName {
    /// Patient zero in the middle of a 5-vertex path, beta = gamma = 1
    Path,
    /// A single vertex with no contacts
    Isolated,
    /// Mean R0 on a ring for beta from 0 to 1
    BetaSweep,
}

#[derive(Clone, Copy, ValueEnum)]
enum TopologyKind {
    Line,
    Ring,
    Star,
    Complete,
    Random,
}

#[derive(Args)]
struct GraphArgs {
    /// Fixture topology to build
    #[arg(short, long, value_enum, default_value_t = TopologyKind::Ring)]
    topology: TopologyKind,

    /// Number of vertices
    #[arg(long, default_value = "100")]
    vertices: usize,

    /// Edge probability for the random topology
    #[arg(long, default_value = "0.05")]
    edge_prob: f64,

    /// Seed for the random topology
    #[arg(long)]
    graph_seed: Option<u64>,

    /// Load the network from an edge-list file instead
    #[arg(long, conflicts_with = "topology")]
    edges: Option<PathBuf>,
}

impl GraphArgs {
    fn build(&self) -> anyhow::Result<ContactGraph> {
        if let Some(path) = &self.edges {
            return load_edge_list(path, 0)
                .with_context(|| format!("failed to load edge list {}", path.display()));
        }

        let builder = TopologyBuilder::new(self.vertices);
        let graph = match self.topology {
            TopologyKind::Line => builder.line(),
            TopologyKind::Ring => builder.ring(),
            TopologyKind::Star => builder.star(),
            TopologyKind::Complete => builder.complete(),
            TopologyKind::Random => {
                let mut rng = match self.graph_seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                builder.random(self.edge_prob, &mut rng)?
            }
        };
        Ok(graph)
    }
}

#[derive(Serialize)]
struct EstimateOutput<'a> {
    seed: u64,
    config: &'a EstimatorConfig,
    summary: R0Summary,
    samples: Vec<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::development()
    } else {
        LogConfig::default()
    };
    let mut logging = EpinetSubscriberBuilder::new()
        .with_config(log_config)
        .with_pretty(cli.log_format == LogFormat::Pretty);
    if let Some(directory) = &cli.log_dir {
        logging = logging.with_file_output(FileConfig {
            directory: directory.clone(),
            ..FileConfig::default()
        });
    }
    let _guard = logging.try_init()?;

    match cli.command {
        Commands::Estimate {
            graph,
            config,
            beta,
            gamma,
            trials,
            seed,
            parallel,
            threads,
            json,
        } => {
            let mut run_config = match &config {
                Some(path) => EstimatorConfig::load(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => EstimatorConfig::default(),
            };
            if let Some(beta) = beta {
                run_config.params.beta = beta;
            }
            if let Some(gamma) = gamma {
                run_config.params.gamma = gamma;
            }
            if let Some(trials) = trials {
                run_config.trials = trials;
            }
            if seed.is_some() {
                run_config.seed = seed;
            }
            if threads.is_some() {
                run_config.threads = threads;
            }
            run_config.parallel |= parallel;

            let graph = graph.build()?;
            info!(
                vertices = graph.vertex_count(),
                edges = graph.edge_count(),
                mean_degree = graph.mean_degree(),
                "Contact network ready"
            );

            let estimator = R0Estimator::new(&graph, run_config)?;
            let report = estimator.run()?;
            let Some(summary) = report.summary() else {
                bail!("run produced no samples");
            };

            if json {
                let output = EstimateOutput {
                    seed: report.seed,
                    config: estimator.config(),
                    summary,
                    samples: report.samples(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", summary.render());
                println!("  Seed: {}", report.seed);
            }
        }
        Commands::Scenario { name, seed, trials } => match name {
            ScenarioName::Path => {
                scenarios::run_path_scenario(seed)?;
            }
            ScenarioName::Isolated => {
                scenarios::run_isolated_scenario(trials, seed)?;
            }
            ScenarioName::BetaSweep => {
                scenarios::run_beta_sweep_scenario(50, 0.2, trials, seed)?;
            }
        },
        Commands::Topology { graph } => {
            let graph = graph.build()?;
            println!("{}", graph.describe());
        }
    }

    Ok(())
}
