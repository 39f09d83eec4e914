use crate::error::SweepError;
use std::collections::HashSet;
use std::path::PathBuf;

/// Which axis of the experiment a sweep parameter moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDimension {
    /// Vary followees per user; content count and cohort size stay fixed.
    Fanout,
    /// Vary the number of concurrent requests per trial; the dataset
    /// shape stays fixed.
    Concurrency,
    /// Vary posts per user; fan-out and cohort size stay fixed.
    PostsPerUser,
}

/// Desired dataset shape handed to the provisioning adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetShape {
    pub users: u32,
    pub posts: u64,
    pub follows_min: u32,
    pub follows_max: u32,
}

/// Full description of one sweep.
///
/// `params` is ordered and must be distinct; whichever shape dimension
/// the sweep does not vary is held at the fixed values below, matching
/// how each sweep point is provisioned.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub dimension: SweepDimension,
    pub params: Vec<u32>,
    /// Concurrent request units per trial (superseded by the parameter
    /// itself on the concurrency axis).
    pub cohort_size: usize,
    /// Trials per sweep point.
    pub repeats: u32,
    pub base_url: String,
    /// Request path with a `{user}` placeholder.
    pub path_template: String,
    /// Size of the eligible identifier pool; identifier `i` renders as
    /// `{user_prefix}{i}` for `1..=user_count`.
    pub user_count: u32,
    pub user_prefix: String,
    pub posts_per_user: u32,
    pub default_fanout: u32,
    /// Append-only results table.
    pub out_csv: PathBuf,
    /// Directory for per-identifier raw tool output.
    pub log_dir: PathBuf,
}

impl SweepConfig {
    pub fn new(
        dimension: SweepDimension,
        params: Vec<u32>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            dimension,
            params,
            cohort_size: 50,
            repeats: 3,
            base_url: base_url.into(),
            path_template: "/api/timeline?user={user}&limit=20".to_string(),
            user_count: 1000,
            user_prefix: "user".to_string(),
            posts_per_user: 100,
            default_fanout: 20,
            out_csv: PathBuf::from("out/sweep.csv"),
            log_dir: PathBuf::from("out/logs"),
        }
    }

    /// Rejects configurations that could not run a single trial. Called
    /// before any dataset is touched or any request issued.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.params.is_empty() {
            return Err(SweepError::EmptySweep);
        }
        let mut seen = HashSet::new();
        for &param in &self.params {
            if !seen.insert(param) {
                return Err(SweepError::DuplicateParam(param));
            }
        }
        if self.cohort_size == 0 {
            return Err(SweepError::InvalidCohort);
        }
        if self.repeats == 0 {
            return Err(SweepError::InvalidRepeats);
        }

        let pool = self.user_count as usize;
        for &param in &self.params {
            let cohort = self.cohort_size_at(param);
            if cohort == 0 {
                return Err(SweepError::InvalidCohort);
            }
            if cohort > pool {
                return Err(SweepError::CohortExceedsPool { cohort, pool });
            }
        }
        Ok(())
    }

    /// Effective cohort size at a given sweep point.
    pub fn cohort_size_at(&self, param: u32) -> usize {
        match self.dimension {
            SweepDimension::Concurrency => param as usize,
            SweepDimension::Fanout | SweepDimension::PostsPerUser => self.cohort_size,
        }
    }

    /// Dataset shape a sweep point must be provisioned to, with the
    /// non-varying dimensions held fixed.
    pub fn shape_for(&self, param: u32) -> DatasetShape {
        let users = self.user_count;
        match self.dimension {
            SweepDimension::Fanout => DatasetShape {
                users,
                posts: u64::from(self.posts_per_user) * u64::from(users),
                follows_min: param,
                follows_max: param,
            },
            SweepDimension::Concurrency => DatasetShape {
                users,
                posts: u64::from(self.posts_per_user) * u64::from(users),
                follows_min: self.default_fanout,
                follows_max: self.default_fanout,
            },
            SweepDimension::PostsPerUser => DatasetShape {
                users,
                posts: u64::from(param) * u64::from(users),
                follows_min: self.default_fanout,
                follows_max: self.default_fanout,
            },
        }
    }

    /// Identifier for a zero-based pool index.
    pub fn user_id(&self, index: usize) -> String {
        format!("{}{}", self.user_prefix, index + 1)
    }

    /// Fully-formed request target for one identifier.
    pub fn target_url(&self, user: &str) -> String {
        format!(
            "{}{}",
            self.base_url,
            self.path_template.replace("{user}", user)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dimension: SweepDimension, params: Vec<u32>) -> SweepConfig {
        SweepConfig::new(dimension, params, "http://localhost:8080")
    }

    #[test]
    fn rejects_cohort_larger_than_pool() {
        let mut cfg = config(SweepDimension::Fanout, vec![10]);
        cfg.user_count = 2;
        cfg.cohort_size = 5;
        assert!(matches!(
            cfg.validate(),
            Err(SweepError::CohortExceedsPool { cohort: 5, pool: 2 })
        ));
    }

    #[test]
    fn rejects_concurrency_param_larger_than_pool() {
        let mut cfg = config(SweepDimension::Concurrency, vec![10, 2000]);
        cfg.user_count = 1000;
        assert!(matches!(
            cfg.validate(),
            Err(SweepError::CohortExceedsPool { cohort: 2000, .. })
        ));
    }

    #[test]
    fn rejects_empty_and_duplicate_params() {
        assert!(matches!(
            config(SweepDimension::Fanout, vec![]).validate(),
            Err(SweepError::EmptySweep)
        ));
        assert!(matches!(
            config(SweepDimension::Fanout, vec![10, 50, 10]).validate(),
            Err(SweepError::DuplicateParam(10))
        ));
    }

    #[test]
    fn rejects_zero_repeats_and_zero_cohort() {
        let mut cfg = config(SweepDimension::Fanout, vec![10]);
        cfg.repeats = 0;
        assert!(matches!(cfg.validate(), Err(SweepError::InvalidRepeats)));

        let mut cfg = config(SweepDimension::Fanout, vec![10]);
        cfg.cohort_size = 0;
        assert!(matches!(cfg.validate(), Err(SweepError::InvalidCohort)));

        // On the concurrency axis the parameter is the cohort size.
        let cfg = config(SweepDimension::Concurrency, vec![0]);
        assert!(matches!(cfg.validate(), Err(SweepError::InvalidCohort)));
    }

    #[test]
    fn concurrency_param_sets_cohort_size() {
        let cfg = config(SweepDimension::Concurrency, vec![10, 50]);
        assert_eq!(cfg.cohort_size_at(10), 10);

        let cfg = config(SweepDimension::Fanout, vec![10, 50]);
        assert_eq!(cfg.cohort_size_at(10), 50);
    }

    #[test]
    fn fanout_shape_pins_follow_bounds_to_param() {
        let cfg = config(SweepDimension::Fanout, vec![10, 50, 100]);
        let shape = cfg.shape_for(50);
        assert_eq!(
            shape,
            DatasetShape {
                users: 1000,
                posts: 100_000,
                follows_min: 50,
                follows_max: 50,
            }
        );
    }

    #[test]
    fn posts_shape_scales_content_count() {
        let cfg = config(SweepDimension::PostsPerUser, vec![10, 100]);
        let shape = cfg.shape_for(10);
        assert_eq!(shape.posts, 10_000);
        assert_eq!(shape.follows_min, 20);
        assert_eq!(shape.follows_max, 20);
    }

    #[test]
    fn target_url_substitutes_identifier() {
        let cfg = config(SweepDimension::Fanout, vec![10]);
        assert_eq!(cfg.user_id(0), "user1");
        assert_eq!(
            cfg.target_url("user7"),
            "http://localhost:8080/api/timeline?user=user7&limit=20"
        );
    }
}
