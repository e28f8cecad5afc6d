//! Per-IP request throttling for the mutating endpoints.
//!
//! Token bucket per client IP: up to `burst` requests can land at once,
//! refilled at `rps` tokens per second.  Buckets for idle clients are purged
//! by a background task spawned from `main`.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug)]
struct Bucket {
    allowance: f64,
    last_seen: Instant,
}

/// Shared per-IP throttle state.
#[derive(Clone)]
pub struct Throttle {
    buckets: Arc<Mutex<HashMap<IpAddr, Bucket>>>,
    rps: f64,
    burst: f64,
}

impl Throttle {
    pub fn new(rps: f64, burst: f64) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            rps,
            burst,
        }
    }

    /// Returns `true` if a request from `ip` is within budget.
    pub async fn admit(&self, ip: IpAddr) -> bool {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();

        let bucket = buckets.entry(ip).or_insert(Bucket {
            allowance: self.burst,
            last_seen: now,
        });

        let elapsed = now.duration_since(bucket.last_seen).as_secs_f64();
        bucket.allowance = (bucket.allowance + elapsed * self.rps).min(self.burst);
        bucket.last_seen = now;

        if bucket.allowance < 1.0 {
            return false;
        }
        bucket.allowance -= 1.0;
        true
    }

    /// Drop buckets that have been idle longer than `max_idle`.
    pub async fn purge_idle(&self, max_idle: Duration) {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();
        buckets.retain(|_, bucket| now.duration_since(bucket.last_seen) < max_idle);
    }

    #[cfg(test)]
    async fn bucket_count(&self) -> usize {
        self.buckets.lock().await.len()
    }
}

pub async fn throttle_middleware(
    State(throttle): State<Throttle>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(ip) = client_ip(&req) {
        if !throttle.admit(ip).await {
            warn!(ip = %ip, "request throttled");
            return Err(StatusCode::TOO_MANY_REQUESTS);
        }
    }

    Ok(next.run(req).await)
}

/// Try ConnectInfo first, then the first X-Forwarded-For hop.
fn client_ip<B>(req: &Request<B>) -> Option<IpAddr> {
    if let Some(connect_info) = req.extensions().get::<ConnectInfo<std::net::SocketAddr>>() {
        return Some(connect_info.0.ip());
    }

    req.headers()
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}
