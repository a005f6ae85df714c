//! Health endpoints: liveness and readiness probes plus a storage-aware
//! status report.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::domain::ports::StorageHealth;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    started: Instant,
    storage: Arc<dyn StorageHealth>,
}

impl HealthState {
    /// Create a state that starts live but not ready.
    pub fn new(storage: Arc<dyn StorageHealth>) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            started: Instant::now(),
            storage,
        }
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Whether the readiness probe passes.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Whether the liveness probe passes.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseStatus,
    pub uptime_seconds: u64,
    pub version: &'static str,
}

/// Storage section of the health report.
#[derive(Debug, Serialize)]
pub struct DatabaseStatus {
    pub backend: &'static str,
    pub reachable: bool,
}

/// Report process and storage health; 503 when storage cannot be reached.
#[get("/health")]
pub async fn health(state: web::Data<HealthState>) -> HttpResponse {
    let reachable = match state.storage.ping().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, backend = state.storage.backend(), "storage ping failed");
            false
        }
    };
    let report = HealthReport {
        status: if reachable { "ok" } else { "degraded" },
        timestamp: Utc::now(),
        database: DatabaseStatus {
            backend: state.storage.backend(),
            reachable,
        },
        uptime_seconds: state.started.elapsed().as_secs(),
        version: VERSION,
    };

    let mut response = if reachable {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(report)
}

/// Readiness probe. 200 once the server is wired, 503 before that.
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. 200 while the process is marked alive and 503 once draining.
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

/// Service banner pointing clients at the GraphQL endpoint.
#[get("/")]
pub async fn banner() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "eventgo",
        "version": VERSION,
        "graphql": "/graphql",
        "health": "/health",
    }))
}
