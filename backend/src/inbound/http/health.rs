//! Health endpoints: liveness and readiness probes for orchestration and load balancers.
//! Document endpoints in OpenAPI via Utoipa.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use tracing::warn;

use crate::domain::ports::StorageProbe;

/// Shared health state for readiness and liveness checks.
///
/// Readiness additionally requires the storage probe, when configured, to
/// answer.
pub struct HealthState {
    ready: AtomicBool,
    storage: Option<Arc<dyn StorageProbe>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            storage: None,
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a storage probe consulted by readiness checks.
    pub fn with_storage_probe(mut self, probe: Arc<dyn StorageProbe>) -> Self {
        self.storage = Some(probe);
        self
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn storage_reachable(&self) -> bool {
        let Some(probe) = &self.storage else {
            return true;
        };
        match probe.ping().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "readiness storage probe failed");
                false
            }
        }
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

/// Readiness probe. Return 200 when the server is marked ready and storage answers; return 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server or storage is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let ok = state.is_ready() && state.storage_reachable().await;
    HealthState::probe_response(ok)
}

/// Liveness probe. Answers 200 whenever the worker can serve a request.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive")
    )
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    HealthState::probe_response(true)
}
