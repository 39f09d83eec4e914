//! Reduces one trial's cohort of raw outputs into a single record.

use crate::cohort::RequestOutcome;
use crate::sink::Record;

/// Summary-line label latencies are scraped from. ApacheBench prints it
/// as e.g. `Time per request:       38.212 [ms] (mean)`.
pub const TIME_PER_REQUEST_LABEL: &str = "Time per request:";

/// Pulls the time-per-request value (milliseconds) out of one unit's raw
/// output. The first matching line wins; `ab` repeats the label for its
/// across-all-concurrent variant, and at `-c 1` the two agree.
pub fn extract_time_per_request(raw: &str) -> Option<f64> {
    raw.lines()
        .find(|line| line.trim_start().starts_with(TIME_PER_REQUEST_LABEL))
        .and_then(|line| line.split_whitespace().nth(3))
        .and_then(|field| field.parse::<f64>().ok())
}

/// Deterministic reduction of a cohort into one record.
///
/// The failure flag and the average are independent signals: any member
/// failure flags the trial, while the average is still the mean of
/// whatever latencies could be parsed. Only when nothing parsed at all
/// does the average default to 0.
pub fn reduce(param: u32, run: u32, outcomes: &[RequestOutcome]) -> Record {
    let mut failed = false;
    let mut latencies = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        match outcome.raw.as_deref().and_then(extract_time_per_request) {
            Some(ms) if outcome.ok => latencies.push(ms),
            Some(ms) => {
                // The unit exited non-zero but still printed a summary;
                // keep the measurement, flag the trial.
                latencies.push(ms);
                failed = true;
            }
            None => failed = true,
        }
    }

    let avg_time_ms = if latencies.is_empty() {
        failed = true;
        0.0
    } else {
        latencies.iter().sum::<f64>() / latencies.len() as f64
    };

    Record {
        param,
        avg_time_ms,
        run,
        failed,
    }
}
