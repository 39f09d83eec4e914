use crate::config::DatasetShape;
use crate::error::SweepError;
use std::future::Future;
use tokio::process::Command;
use tracing::{info, warn};

/// Reshapes the backing dataset before a sweep point's trials run.
///
/// The driver waits for completion; a failure is fatal for that sweep
/// point's trials (never for the whole sweep).
pub trait Provisioner: Send + Sync {
    fn reshape(
        &self,
        shape: &DatasetShape,
    ) -> impl Future<Output = Result<(), SweepError>> + Send;
}

/// Runs an external seeding command with the standard shape flags
/// appended, e.g.
/// `python3 seed.py --users 1000 --posts 100000 --follows-min 20
/// --follows-max 20 --prefix user`.
#[derive(Debug, Clone)]
pub struct SeedCommand {
    program: String,
    base_args: Vec<String>,
    user_prefix: String,
}

impl SeedCommand {
    /// Splits `command` on whitespace: first token is the program, the
    /// rest are leading arguments. Returns `None` for an empty command.
    pub fn parse(command: &str, user_prefix: impl Into<String>) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            base_args: parts.collect(),
            user_prefix: user_prefix.into(),
        })
    }
}

impl Provisioner for SeedCommand {
    fn reshape(
        &self,
        shape: &DatasetShape,
    ) -> impl Future<Output = Result<(), SweepError>> + Send {
        let program = self.program.clone();
        let mut args = self.base_args.clone();
        args.extend([
            "--users".to_string(),
            shape.users.to_string(),
            "--posts".to_string(),
            shape.posts.to_string(),
            "--follows-min".to_string(),
            shape.follows_min.to_string(),
            "--follows-max".to_string(),
            shape.follows_max.to_string(),
            "--prefix".to_string(),
            self.user_prefix.clone(),
        ]);

        async move {
            info!("reshaping dataset: {program} {}", args.join(" "));
            let output = Command::new(&program)
                .args(&args)
                .output()
                .await
                .map_err(|err| {
                    SweepError::Provisioning(format!("could not run {program}: {err}"))
                })?;

            if output.status.success() {
                Ok(())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let last_line = stderr
                    .lines()
                    .rev()
                    .find(|line| !line.trim().is_empty())
                    .unwrap_or("no stderr");
                Err(SweepError::Provisioning(format!(
                    "{program} exited with {}: {last_line}",
                    output.status
                )))
            }
        }
    }
}

/// Skips provisioning entirely; the dataset is assumed to already match
/// every requested shape. Used when no seed command is configured, and
/// by tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProvisioner;

impl Provisioner for NoopProvisioner {
    fn reshape(
        &self,
        shape: &DatasetShape,
    ) -> impl Future<Output = Result<(), SweepError>> + Send {
        warn!("no seed command configured; assuming dataset already matches {shape:?}");
        std::future::ready(Ok(()))
    }
}
