use crate::config::{BatchPolicy, LoopGeneratorConfig};
use crate::error::{AppError, Result};
use crate::models::loop_route::validate_batch_size;
use crate::models::{AttemptOutcome, BatchReport, GeoPoint, Loop, LoopDraft, LoopRequest};
use crate::registry::LoopRegistry;
use crate::services::geocoding::Geocoder;
use crate::services::osrm::RoutingService;
use crate::services::waypoint_generator::WaypointGenerator;
use crate::surface::MapSurface;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Runs generation batches: geocode once, then generate, route, register and
/// draw one loop per attempt.
pub struct LoopOrchestrator {
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn RoutingService>,
    registry: Arc<LoopRegistry>,
    surface: Arc<dyn MapSurface>,
    generator: WaypointGenerator,
    policy: BatchPolicy,
    // Held for a whole batch so attempts from two batches never interleave.
    batch_lock: Mutex<()>,
}

impl LoopOrchestrator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RoutingService>,
        registry: Arc<LoopRegistry>,
        surface: Arc<dyn MapSurface>,
        config: &LoopGeneratorConfig,
    ) -> Self {
        LoopOrchestrator {
            geocoder,
            router,
            registry,
            surface,
            generator: WaypointGenerator::new(config),
            policy: config.batch_policy,
            batch_lock: Mutex::new(()),
        }
    }

    /// Generate up to `count` loops around `request.origin_address`.
    ///
    /// Fails with [`AppError::AddressNotFound`] before any attempt if the
    /// address does not resolve. Per-attempt failures never fail the batch;
    /// they are reported in the returned [`BatchReport`].
    pub async fn generate_loops<R: Rng + Send>(
        &self,
        request: &LoopRequest,
        count: usize,
        rng: &mut R,
    ) -> Result<BatchReport> {
        request.validate().map_err(AppError::InvalidRequest)?;
        validate_batch_size(count).map_err(AppError::InvalidRequest)?;

        let _batch = self.batch_lock.lock().await;

        tracing::info!(
            address = %request.origin_address,
            distance_km = request.target_distance_km,
            count,
            "Loop batch request: '{}', {:.1}km x{}",
            request.origin_address, request.target_distance_km, count
        );

        let origin = self
            .geocoder
            .geocode(&request.origin_address)
            .await?
            .ok_or_else(|| AppError::AddressNotFound(request.origin_address.clone()))?;

        let mut attempts = Vec::with_capacity(count);
        let mut loops = Vec::new();

        for attempt in 0..count {
            let outcome = self.run_attempt(request, origin, rng).await;
            tracing::debug!(attempt, ?outcome, "Attempt {} finished", attempt + 1);

            if let AttemptOutcome::Added { loop_id } = outcome {
                if let Some(record) = self.registry.get(loop_id) {
                    loops.push(record);
                }
            }
            let failed = outcome.is_failure();
            attempts.push(outcome);

            if failed && self.policy == BatchPolicy::AbortRemaining {
                let skipped = count - attempt - 1;
                if skipped > 0 {
                    tracing::info!(
                        skipped,
                        "Aborting batch after attempt {}: {} attempt(s) skipped",
                        attempt + 1,
                        skipped
                    );
                }
                attempts.extend(std::iter::repeat(AttemptOutcome::Skipped).take(skipped));
                break;
            }
        }

        let message = BatchReport::status_message(loops.len());
        tracing::info!(
            added = loops.len(),
            requested = count,
            "Loop batch finished: {}",
            message
        );

        Ok(BatchReport {
            origin,
            attempts,
            loops,
            total_loops: self.registry.len(),
            message,
        })
    }

    async fn run_attempt<R: Rng + Send>(
        &self,
        request: &LoopRequest,
        origin: GeoPoint,
        rng: &mut R,
    ) -> AttemptOutcome {
        let polygon = self
            .generator
            .generate(origin, request.target_distance_km, rng);

        let path = match self.router.route(&polygon).await {
            Ok(Some(path)) => path,
            Ok(None) => return AttemptOutcome::NoRoute,
            Err(e) => {
                tracing::warn!(error = %e, "Routing failed for loop attempt");
                return AttemptOutcome::RoutingFailed {
                    reason: e.to_string(),
                };
            }
        };

        if !self.surface.is_ready() {
            tracing::warn!("Map surface not initialized, dropping routed loop");
            return AttemptOutcome::SurfaceUnavailable;
        }

        let record = self.registry.append(LoopDraft {
            origin_address: request.origin_address.clone(),
            origin,
            requested_distance_km: request.target_distance_km,
            path,
        });
        self.render(&record);

        tracing::info!(
            loop_id = record.id,
            color = %record.color,
            "Loop #{} added: {:.2}km (target: {:.1}km)",
            record.id,
            record.actual_distance_km,
            record.requested_distance_km
        );

        AttemptOutcome::Added { loop_id: record.id }
    }

    /// Draw the loop and fit the viewport to it. The loop stays registered
    /// even if the surface refuses it.
    fn render(&self, record: &Loop) {
        let drawn = self
            .surface
            .draw_path(&record.path.points, &record.color)
            .and_then(|handle| self.surface.fit_bounds(handle));

        if let Err(e) = drawn {
            tracing::warn!(loop_id = record.id, error = %e, "Failed to draw loop");
        }
    }
}
