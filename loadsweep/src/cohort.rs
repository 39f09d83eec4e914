use crate::config::SweepConfig;
use crate::error::SweepError;
use crate::executor::RequestExecutor;
use rand::seq::index::sample;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What one concurrent request-execution unit came back with.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    pub user: String,
    /// Raw tool output; absent when the unit never produced any.
    pub raw: Option<String>,
    pub ok: bool,
}

/// Fans one trial out to `k` concurrent request units and joins them all.
///
/// Units share nothing beyond their identifier assignment. There is no
/// cancellation and no timeout layer here: a hung unit hangs the trial.
#[derive(Debug)]
pub struct CohortLauncher<E> {
    executor: E,
    log_dir: PathBuf,
}

impl<E: RequestExecutor> CohortLauncher<E> {
    pub fn new(executor: E, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            log_dir: log_dir.into(),
        }
    }

    /// Runs one trial's cohort to completion.
    ///
    /// Draws `k` distinct identifiers without replacement, issues one
    /// concurrent unit per identifier, persists each unit's raw output
    /// to `{log_dir}/P{param}_R{run}_u{i}.log`, and returns exactly `k`
    /// outcomes in no particular order. Never a partial set.
    pub async fn launch(
        &self,
        config: &SweepConfig,
        param: u32,
        run: u32,
    ) -> Result<Vec<RequestOutcome>, SweepError> {
        let k = config.cohort_size_at(param);
        let pool = config.user_count as usize;
        if k > pool {
            return Err(SweepError::CohortExceedsPool { cohort: k, pool });
        }

        tokio::fs::create_dir_all(&self.log_dir).await?;

        let picks = sample(&mut rand::thread_rng(), pool, k).into_vec();

        let mut tasks: Vec<JoinHandle<RequestOutcome>> = Vec::with_capacity(k);
        for index in picks {
            let user = config.user_id(index);
            let target = config.target_url(&user);
            let log_path = self
                .log_dir
                .join(format!("P{param}_R{run}_u{}.log", index + 1));
            let executor = self.executor.clone();

            tasks.push(tokio::spawn(async move {
                debug!("issuing request unit for {user}");
                let output = executor.execute(target).await;
                if let Err(err) = tokio::fs::write(&log_path, &output.raw).await {
                    // The in-memory outcome still feeds the reducer; the
                    // log only exists for post-crash inspection.
                    warn!("could not persist {}: {err}", log_path.display());
                }
                RequestOutcome {
                    user,
                    raw: Some(output.raw),
                    ok: output.ok,
                }
            }));
        }

        // Full join, stragglers included.
        let mut outcomes = Vec::with_capacity(k);
        for task in tasks {
            match task.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    warn!("request unit panicked: {err}");
                    outcomes.push(RequestOutcome {
                        user: String::new(),
                        raw: None,
                        ok: false,
                    });
                }
            }
        }

        Ok(outcomes)
    }
}
