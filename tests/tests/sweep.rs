mod utils;
#[allow(unused)]
use utils::*;

use loadsweep::{
    HttpExecutor, NoopProvisioner, SweepConfig, SweepDimension, SweepDriver,
};
use std::fs;

fn base_config(addr: std::net::SocketAddr, dir: &std::path::Path) -> SweepConfig {
    let mut config = SweepConfig::new(
        SweepDimension::Concurrency,
        vec![2, 4],
        format!("http://{addr}"),
    );
    config.repeats = 2;
    config.user_count = 10;
    config.path_template = "/api/timeline?user={user}&limit=5".to_string();
    config.out_csv = dir.join("sweep.csv");
    config.log_dir = dir.join("logs");
    config
}

#[tokio::test]
async fn concurrency_sweep_end_to_end() {
    let addr = init().await;
    let dir = tempfile::tempdir().unwrap();
    let config = base_config(addr, dir.path());

    let driver =
        SweepDriver::new(config.clone(), NoopProvisioner, HttpExecutor::new(2)).unwrap();
    let summary = driver.run().await.unwrap();

    assert!(summary.all_points_provisioned());
    assert_eq!(summary.trials_recorded, 4);
    assert_eq!(summary.trials_failed, 0);

    let csv = fs::read_to_string(&config.out_csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "PARAM,AVG_TIME,RUN,FAILED");

    // Sweep points in declared order, run indices increasing, no failures.
    assert!(lines[1].starts_with("2,") && lines[1].ends_with(",1,0"));
    assert!(lines[2].starts_with("2,") && lines[2].ends_with(",2,0"));
    assert!(lines[3].starts_with("4,") && lines[3].ends_with(",1,0"));
    assert!(lines[4].starts_with("4,") && lines[4].ends_with(",2,0"));

    // The mock sleeps ~20ms per request, so averages are real numbers.
    for line in &lines[1..] {
        let avg: f64 = line.split(',').nth(1).unwrap().parse().unwrap();
        assert!(avg > 1.0, "implausible average in {line}");
    }

    // One raw log per identifier per trial, persisted before the join.
    let logs = fs::read_dir(&config.log_dir).unwrap().count();
    assert_eq!(logs, 2 + 2 + 4 + 4);
}

#[tokio::test]
async fn store_accumulates_across_sweeps() {
    let addr = init().await;
    let dir = tempfile::tempdir().unwrap();
    let config = base_config(addr, dir.path());

    let driver =
        SweepDriver::new(config.clone(), NoopProvisioner, HttpExecutor::new(1)).unwrap();
    driver.run().await.unwrap();
    let first = fs::read_to_string(&config.out_csv).unwrap();

    let driver =
        SweepDriver::new(config.clone(), NoopProvisioner, HttpExecutor::new(1)).unwrap();
    driver.run().await.unwrap();
    let second = fs::read_to_string(&config.out_csv).unwrap();

    assert!(second.starts_with(&first));
    assert_eq!(second.lines().count(), first.lines().count() + 4);
}

#[tokio::test]
async fn fully_failing_endpoint_yields_failed_records() {
    let addr = init().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = base_config(addr, dir.path());
    config.params = vec![3];
    config.repeats = 1;
    config.path_template = "/flaky/100/api/timeline?user={user}&limit=5".to_string();

    let driver =
        SweepDriver::new(config.clone(), NoopProvisioner, HttpExecutor::new(2)).unwrap();
    let summary = driver.run().await.unwrap();

    // Trial failures are recorded, never escalated.
    assert!(summary.all_points_provisioned());
    assert_eq!(summary.trials_recorded, 1);
    assert_eq!(summary.trials_failed, 1);

    let csv = fs::read_to_string(&config.out_csv).unwrap();
    assert_eq!(csv.lines().nth(1), Some("3,0.000,1,1"));
}

#[tokio::test]
async fn fixed_delay_sweep_measures_the_delay() {
    let addr = init().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = base_config(addr, dir.path());
    config.params = vec![2];
    config.repeats = 1;
    config.path_template = "/delay/ms/30/api/timeline?user={user}&limit=5".to_string();

    let driver =
        SweepDriver::new(config.clone(), NoopProvisioner, HttpExecutor::new(2)).unwrap();
    let summary = driver.run().await.unwrap();
    assert_eq!(summary.trials_failed, 0);

    let csv = fs::read_to_string(&config.out_csv).unwrap();
    let avg: f64 = csv
        .lines()
        .nth(1)
        .unwrap()
        .split(',')
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    assert!(avg >= 30.0, "average {avg}ms below the configured delay");
}
