//! U-Packing benchmark runner CLI

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use u_packing_benchmark::{
    builtin_instance, builtin_instances, BenchmarkConfig, BenchmarkResult, BenchmarkRunner,
    Dataset, DatasetParser,
};
use u_packing_core::Strategy;

#[derive(Parser)]
#[command(name = "bench-runner")]
#[command(about = "3D bin packing benchmark runner for U-Packing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in instances
    List,

    /// Run benchmark on a built-in instance
    Run {
        /// Instance name (small, medium, large)
        #[arg(short, long)]
        instance: String,

        #[command(flatten)]
        opts: RunOpts,
    },

    /// Run benchmark on an instance loaded from a JSON file
    RunFile {
        /// Path to the JSON instance file
        file: PathBuf,

        #[command(flatten)]
        opts: RunOpts,
    },
}

#[derive(clap::Args)]
struct RunOpts {
    /// Strategies to benchmark
    #[arg(short, long, value_enum, num_args = 1.., default_values_t = vec![StrategyArg::Ffd, StrategyArg::Ls, StrategyArg::Sa])]
    strategies: Vec<StrategyArg>,

    /// Random seed (omit for entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Time limit per run in seconds (0 = unlimited)
    #[arg(short, long, default_value = "0")]
    time_limit: u64,

    /// Local search iteration cap
    #[arg(long, default_value = "100")]
    max_iterations: usize,

    /// Number of runs per strategy
    #[arg(short, long, default_value = "1")]
    runs: usize,

    /// Output file for results (JSON)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// First Fit Decreasing
    Ffd,
    /// Local search
    Ls,
    /// Simulated annealing
    Sa,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Ffd => Strategy::FirstFitDecreasing,
            StrategyArg::Ls => Strategy::LocalSearch,
            StrategyArg::Sa => Strategy::SimulatedAnnealing,
        }
    }
}

fn run(dataset: &Dataset, opts: RunOpts) -> anyhow::Result<()> {
    println!(
        "Instance: {} ({} items, bin {} x {} x {}, theoretical min {} bins)",
        dataset.name,
        dataset.items.len(),
        dataset.bin.length,
        dataset.bin.width,
        dataset.bin.height,
        dataset.theoretical_min_bins()
    );

    let strategies: Vec<Strategy> = opts.strategies.into_iter().map(Into::into).collect();
    let config = BenchmarkConfig::new()
        .with_strategies(strategies)
        .with_seed(opts.seed)
        .with_time_limit(opts.time_limit * 1000)
        .with_max_iterations(opts.max_iterations)
        .with_runs_per_config(opts.runs);

    let results: BenchmarkResult = BenchmarkRunner::new(config).run_dataset(dataset);
    results.print_summary();

    if opts.runs > 1 {
        println!("\nStrategy Comparison:");
        println!("{:-<60}", "");
        for summary in results.summary_by_strategy() {
            println!(
                "  {:<20} runs={:<3} avg_bins={:.2} avg_util={:.1}% avg_time={}ms",
                summary.strategy,
                summary.run_count,
                summary.avg_bins,
                summary.avg_utilization,
                summary.avg_time_ms
            );
        }
    }

    if let Some(path) = opts.output {
        results
            .save_json(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Results saved to: {}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            println!("Built-in Instances:");
            println!("===================");
            for info in builtin_instances() {
                println!("  - {:<8} {}", info.key, info.description);
            }
            println!("\nUse 'bench-runner run -i <INSTANCE>' to run benchmarks");
        }

        Commands::Run { instance, opts } => {
            let dataset = builtin_instance(&instance)
                .with_context(|| format!("unknown instance '{}'", instance))?;
            run(&dataset, opts)?;
        }

        Commands::RunFile { file, opts } => {
            let dataset = DatasetParser::new()
                .parse_file(&file)
                .with_context(|| format!("loading {}", file.display()))?;
            run(&dataset, opts)?;
        }
    }

    Ok(())
}
