use clap::{Parser, ValueEnum};
use loadsweep::{
    AbExecutor, HttpExecutor, NoopProvisioner, RequestExecutor, SeedCommand, SweepConfig,
    SweepDimension, SweepDriver, SweepError, SweepSummary,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(
    name = "loadsweep",
    about = "Parameter-sweep load experiments with durable per-trial records",
    long_about = None
)]
struct Cli {
    /// Axis the sweep parameters move
    #[arg(long, value_enum, default_value_t = Dimension::Concurrency)]
    dimension: Dimension,

    /// Parameter values to test, in order (e.g. 10,50,100)
    #[arg(long, value_delimiter = ',', required = true)]
    params: Vec<u32>,

    /// Concurrent request units per trial (superseded by the parameter
    /// itself with --dimension concurrency)
    #[arg(long, default_value_t = 50)]
    cohort_size: usize,

    /// Trials per sweep point
    #[arg(long, default_value_t = 3)]
    repeats: u32,

    /// Base URL of the target API
    #[arg(long)]
    base_url: String,

    /// Request path with a `{user}` placeholder
    #[arg(long, default_value = "/api/timeline?user={user}&limit=20")]
    path_template: String,

    /// Size of the eligible identifier pool
    #[arg(long, default_value_t = 1000)]
    users: u32,

    /// Identifier prefix; identifier i renders as `{prefix}{i}`
    #[arg(long, default_value = "user")]
    user_prefix: String,

    /// Posts per user on the axes that hold content count fixed
    #[arg(long, default_value_t = 100)]
    posts_per_user: u32,

    /// Followees per user on the axes that hold fan-out fixed
    #[arg(long, default_value_t = 20)]
    fanout: u32,

    /// Requests each execution unit issues against its target
    #[arg(long, default_value_t = 10)]
    requests_per_target: u32,

    /// How requests are issued and timed
    #[arg(long, value_enum, default_value_t = ExecutorKind::Ab)]
    executor: ExecutorKind,

    /// External seeding command; the shape flags (--users, --posts,
    /// --follows-min, --follows-max, --prefix) are appended per sweep
    /// point. Provisioning is skipped when absent.
    #[arg(long)]
    seed_cmd: Option<String>,

    /// Append-only results table
    #[arg(long, default_value = "out/sweep.csv")]
    out: PathBuf,

    /// Directory for per-identifier raw tool output
    #[arg(long, default_value = "out/logs")]
    log_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dimension {
    Fanout,
    Concurrency,
    Posts,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExecutorKind {
    /// Shell out to ApacheBench
    Ab,
    /// Built-in reqwest-based executor
    Http,
}

fn build_config(cli: &Cli) -> SweepConfig {
    let dimension = match cli.dimension {
        Dimension::Fanout => SweepDimension::Fanout,
        Dimension::Concurrency => SweepDimension::Concurrency,
        Dimension::Posts => SweepDimension::PostsPerUser,
    };

    let mut config = SweepConfig::new(dimension, cli.params.clone(), cli.base_url.clone());
    config.cohort_size = cli.cohort_size;
    config.repeats = cli.repeats;
    config.path_template = cli.path_template.clone();
    config.user_count = cli.users;
    config.user_prefix = cli.user_prefix.clone();
    config.posts_per_user = cli.posts_per_user;
    config.default_fanout = cli.fanout;
    config.out_csv = cli.out.clone();
    config.log_dir = cli.log_dir.clone();
    config
}

async fn run_with<E: RequestExecutor>(
    config: SweepConfig,
    seed: Option<SeedCommand>,
    executor: E,
) -> Result<SweepSummary, SweepError> {
    match seed {
        Some(seed) => SweepDriver::new(config, seed, executor)?.run().await,
        None => SweepDriver::new(config, NoopProvisioner, executor)?.run().await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    let seed = match cli.seed_cmd.as_deref() {
        Some(cmd) => match SeedCommand::parse(cmd, &cli.user_prefix) {
            Some(seed) => Some(seed),
            None => {
                error!("--seed-cmd is empty");
                return ExitCode::from(2);
            }
        },
        None => None,
    };

    let result = match cli.executor {
        ExecutorKind::Ab => {
            run_with(config, seed, AbExecutor::new(cli.requests_per_target)).await
        }
        ExecutorKind::Http => {
            run_with(config, seed, HttpExecutor::new(cli.requests_per_target)).await
        }
    };

    match result {
        Ok(summary) if summary.all_points_provisioned() => ExitCode::SUCCESS,
        Ok(summary) => {
            error!(
                "provisioning failed for parameters {:?}; their trials did not run",
                summary.provisioning_failures
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("sweep aborted: {err}");
            ExitCode::from(2)
        }
    }
}
