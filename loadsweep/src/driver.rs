use crate::cohort::CohortLauncher;
use crate::config::SweepConfig;
use crate::error::SweepError;
use crate::executor::RequestExecutor;
use crate::provision::Provisioner;
use crate::reduce;
use crate::sink::ResultSink;
use tracing::{error, info, instrument};

/// What a finished sweep looked like; drives the exit-code policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Sweep points declared, including skipped ones.
    pub points: usize,
    /// Parameters whose reshape step failed; their trials never ran.
    pub provisioning_failures: Vec<u32>,
    pub trials_recorded: usize,
    pub trials_failed: usize,
}

impl SweepSummary {
    pub fn all_points_provisioned(&self) -> bool {
        self.provisioning_failures.is_empty()
    }
}

/// Top-level control loop: provision, then trial, then record, strictly
/// sequential across sweep points and trials.
#[derive(Debug)]
pub struct SweepDriver<P, E> {
    config: SweepConfig,
    provisioner: P,
    launcher: CohortLauncher<E>,
    sink: ResultSink,
}

impl<P: Provisioner, E: RequestExecutor> SweepDriver<P, E> {
    /// Validates the configuration up front; an oversized cohort or an
    /// empty parameter list never reaches the network.
    pub fn new(config: SweepConfig, provisioner: P, executor: E) -> Result<Self, SweepError> {
        config.validate()?;
        let launcher = CohortLauncher::new(executor, config.log_dir.clone());
        let sink = ResultSink::new(config.out_csv.clone());
        Ok(Self {
            config,
            provisioner,
            launcher,
            sink,
        })
    }

    /// Runs the whole sweep.
    ///
    /// A provisioning failure skips that point's trials and the sweep
    /// moves on. Trial failures are absorbed into their records. Each
    /// record is appended as soon as its trial reduces, so a crash
    /// between trials loses at most the one in flight. Only store I/O
    /// aborts the run.
    #[instrument(skip_all, fields(dimension = ?self.config.dimension))]
    pub async fn run(&self) -> Result<SweepSummary, SweepError> {
        let mut summary = SweepSummary {
            points: self.config.params.len(),
            ..Default::default()
        };

        for &param in &self.config.params {
            let shape = self.config.shape_for(param);
            info!("sweep point {param}: provisioning to {shape:?}");

            if let Err(err) = self.provisioner.reshape(&shape).await {
                error!("skipping sweep point {param}: {err}");
                summary.provisioning_failures.push(param);
                continue;
            }

            for run in 1..=self.config.repeats {
                let outcomes = self.launcher.launch(&self.config, param, run).await?;
                let record = reduce::reduce(param, run, &outcomes);
                info!(
                    "param={param} run={run} avg={:.3}ms failed={}",
                    record.avg_time_ms,
                    u8::from(record.failed)
                );
                if record.failed {
                    summary.trials_failed += 1;
                }
                self.sink.append(&record)?;
                summary.trials_recorded += 1;
            }
        }

        info!(
            "sweep complete: {} trials recorded ({} failed), {}/{} points provisioned",
            summary.trials_recorded,
            summary.trials_failed,
            summary.points - summary.provisioning_failures.len(),
            summary.points,
        );
        Ok(summary)
    }
}
