use super::{ExecOutput, RequestExecutor};
use crate::reduce::TIME_PER_REQUEST_LABEL;
use std::future::Future;
use std::time::Instant;
use tracing::debug;

/// Built-in executor for hosts without ApacheBench installed.
///
/// Issues the configured number of sequential GETs and prints the same
/// summary line `ab` does, so the reducer sees one contract regardless
/// of adapter. Mirrors `ab`'s failure shape too: any transport error or
/// non-success status ends the unit with no timing line.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    requests: u32,
}

impl HttpExecutor {
    pub fn new(requests: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            requests: requests.max(1),
        }
    }
}

impl RequestExecutor for HttpExecutor {
    fn execute(&self, target: String) -> impl Future<Output = ExecOutput> + Send {
        let client = self.client.clone();
        let requests = self.requests;
        async move {
            let mut total_ms = 0.0_f64;
            for i in 0..requests {
                let start = Instant::now();
                let res = client.get(&target).send().await;
                let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
                match res {
                    Ok(res) if res.status().is_success() => total_ms += elapsed_ms,
                    Ok(res) => {
                        return ExecOutput {
                            raw: format!(
                                "request {i} to {target} returned {}",
                                res.status()
                            ),
                            ok: false,
                        }
                    }
                    Err(err) => {
                        return ExecOutput {
                            raw: format!("request {i} to {target} failed: {err}"),
                            ok: false,
                        }
                    }
                }
            }
            let mean = total_ms / f64::from(requests);
            debug!("GET {target}: mean {mean:.3}ms over {requests} requests");
            ExecOutput {
                raw: format!("{TIME_PER_REQUEST_LABEL}       {mean:.3} [ms] (mean)\n"),
                ok: true,
            }
        }
    }
}
