use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One reduced trial, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub param: u32,
    pub avg_time_ms: f64,
    /// 1-based repeat index within the sweep point.
    pub run: u32,
    pub failed: bool,
}

const HEADER: &str = "PARAM,AVG_TIME,RUN,FAILED";

/// Append-only results table.
///
/// One row per trial; the header is written exactly once, when the file
/// is first created. Rows are never rewritten or reordered, so the table
/// accumulates across separate invocations and survives crashes between
/// trials. Column names and units (milliseconds) are load-bearing for
/// downstream plotting and must not change.
#[derive(Debug, Clone)]
pub struct ResultSink {
    path: PathBuf,
}

impl ResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends exactly one row.
    pub fn append(&self, record: &Record) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let fresh = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if fresh {
            writeln!(file, "{HEADER}")?;
        }
        writeln!(
            file,
            "{},{:.3},{},{}",
            record.param,
            record.avg_time_ms,
            record.run,
            u8::from(record.failed),
        )
    }
}
