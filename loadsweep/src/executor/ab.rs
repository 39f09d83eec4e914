use super::{ExecOutput, RequestExecutor};
use std::future::Future;
use tokio::process::Command;
use tracing::{debug, error};

/// Adapter around the ApacheBench binary.
///
/// Runs `ab -n <requests> -c 1 <target>` and hands the combined console
/// output back untouched; the reducer scrapes the `Time per request:`
/// summary line out of it. Any timeout behavior is `ab`'s own.
#[derive(Debug, Clone)]
pub struct AbExecutor {
    program: String,
    requests: u32,
}

impl AbExecutor {
    pub fn new(requests: u32) -> Self {
        Self::with_program("ab", requests)
    }

    pub fn with_program(program: impl Into<String>, requests: u32) -> Self {
        Self {
            program: program.into(),
            requests: requests.max(1),
        }
    }
}

impl RequestExecutor for AbExecutor {
    fn execute(&self, target: String) -> impl Future<Output = ExecOutput> + Send {
        let program = self.program.clone();
        let requests = self.requests;
        async move {
            debug!("{program} -n {requests} -c 1 {target}");
            let output = Command::new(&program)
                .arg("-n")
                .arg(requests.to_string())
                .arg("-c")
                .arg("1")
                .arg(&target)
                .output()
                .await;

            match output {
                Ok(out) => {
                    let mut raw = String::from_utf8_lossy(&out.stdout).into_owned();
                    raw.push_str(&String::from_utf8_lossy(&out.stderr));
                    ExecOutput {
                        raw,
                        ok: out.status.success(),
                    }
                }
                Err(err) => {
                    error!("failed to spawn {program}: {err}");
                    ExecOutput {
                        raw: format!("failed to spawn {program}: {err}"),
                        ok: false,
                    }
                }
            }
        }
    }
}
