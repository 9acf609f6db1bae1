//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! For tuning knobs that benefit from runtime experimentation, see
//! [`LoopGeneratorConfig`](crate::config::LoopGeneratorConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- External services ---

/// Public Nominatim instance used for geocoding and reverse geocoding.
pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
/// Public OSRM demo server, route service v1.
pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org/route/v1";
/// OSRM accepts at most this many coordinates on the demo server.
pub const MAX_WAYPOINTS: usize = 25;

// --- Cache defaults ---

/// Default geocode cache TTL: 24 hours. Overridden by `GEOCODE_CACHE_TTL`.
pub const DEFAULT_GEOCODE_CACHE_TTL_SECONDS: u64 = 86_400;
/// Maximum entries kept by the in-memory geocode cache.
pub const DEFAULT_MEMORY_CACHE_MAX_ENTRIES: u64 = 1_000;

// --- Map surface defaults ---

/// Initial map view: Paris.
pub const DEFAULT_MAP_CENTER_LAT: f64 = 48.8566;
pub const DEFAULT_MAP_CENTER_LNG: f64 = 2.3522;
pub const DEFAULT_MAP_ZOOM: u8 = 13;

// --- Loop generation ---

/// Approximate length of one degree of latitude, in km.
pub const KM_PER_DEGREE: f64 = 111.0;

/// The routed street path is longer than the straight-line polygon, so the
/// polygon perimeter targets only this fraction of the requested distance.
pub const DEFAULT_CIRCUMFERENCE_FACTOR: f64 = 0.5;

/// Inclusive bounds for the random interior point count.
pub const MIN_RANDOM_POINT_COUNT: usize = 5;
pub const MAX_RANDOM_POINT_COUNT: usize = 9;
/// A loop needs at least a triangle around the center.
pub const MIN_POINT_COUNT: usize = 3;

/// Per-point radius factor range.
pub const RADIUS_FACTOR_MIN: f64 = 0.6;
pub const RADIUS_FACTOR_MAX: f64 = 1.4;

/// Sinusoidal undulation: `sin(i * FREQUENCY) * AMPLITUDE * base_radius`.
pub const UNDULATION_FREQUENCY: f64 = 0.7;
pub const UNDULATION_AMPLITUDE: f64 = 0.2;

/// Accepted target distances (km).
pub const MIN_TARGET_DISTANCE_KM: f64 = 1.0;
pub const MAX_TARGET_DISTANCE_KM: f64 = 50.0;

/// Loops generated per batch when the request does not say.
pub const DEFAULT_BATCH_SIZE: usize = 3;
/// Hard upper bound on loops per batch.
pub const MAX_BATCH_SIZE: usize = 10;
/// Number of loops shown in the recent list.
pub const DEFAULT_RECENT_LIMIT: usize = 6;

/// Colours assigned to loops by creation index, cycling.
pub const LOOP_PALETTE: [&str; 5] = ["#ff6b6b", "#4ecdc4", "#45b7d1", "#f9ca24", "#f0932b"];

/// Colour for the loop with the given creation index.
pub fn palette_color(index: u64) -> &'static str {
    LOOP_PALETTE[(index % LOOP_PALETTE.len() as u64) as usize]
}
