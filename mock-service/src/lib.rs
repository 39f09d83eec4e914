//! In-process stand-in for the timeline API the harness benchmarks.
//! Jittered service times give sweeps something to measure; the flaky
//! routes exercise the failure paths.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

pub async fn run(addr: SocketAddr) {
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, router()).await.unwrap();
}

/// Binds on an ephemeral port and serves in the background. Returns the
/// bound address; used by the integration tests.
pub async fn spawn() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });
    addr
}

fn router() -> Router {
    Router::new()
        .route("/api/timeline", get(timeline))
        .route("/delay/ms/:delay_ms/api/timeline", get(timeline_delay))
        .route("/flaky/:percent/api/timeline", get(timeline_flaky))
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    user: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Serialize)]
struct Post {
    author: String,
    body: String,
}

async fn timeline(Query(query): Query<TimelineQuery>) -> Json<Vec<Post>> {
    REQUESTS.fetch_add(1, Ordering::Relaxed);

    let jitter_ms = {
        let normal = Normal::new(20.0_f64, 5.0).unwrap();
        normal.sample(&mut rand::thread_rng()).max(0.0)
    };
    tokio::time::sleep(Duration::from_secs_f64(jitter_ms / 1e3)).await;

    debug!("timeline for {} (limit {})", query.user, query.limit);
    Json(posts_for(&query.user, query.limit))
}

async fn timeline_delay(
    Path(delay_ms): Path<u64>,
    Query(query): Query<TimelineQuery>,
) -> Json<Vec<Post>> {
    REQUESTS.fetch_add(1, Ordering::Relaxed);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    Json(posts_for(&query.user, query.limit))
}

async fn timeline_flaky(
    Path(percent): Path<u8>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<Vec<Post>>, StatusCode> {
    REQUESTS.fetch_add(1, Ordering::Relaxed);

    let fail = rand::thread_rng().gen_range(0..100u32) < u32::from(percent.min(100));
    if fail {
        debug!("flaky timeline for {}: injected failure", query.user);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(posts_for(&query.user, query.limit)))
}

fn posts_for(user: &str, limit: usize) -> Vec<Post> {
    (0..limit)
        .map(|i| Post {
            author: format!("followee{i}"),
            body: format!("post {i} visible to {user}"),
        })
        .collect()
}

/** Request-rate printer, for manual runs **/

static REQUESTS: AtomicU64 = AtomicU64::new(0);

pub async fn rate_measure_task() {
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let requests = REQUESTS.fetch_min(0, Ordering::Relaxed);
        println!("{requests} req/s");
    }
}
