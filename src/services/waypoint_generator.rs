use crate::config::{LoopGeneratorConfig, PointCount};
use crate::constants::*;
use crate::models::{GeoPoint, WaypointPolygon};
use rand::Rng;
use std::f64::consts::TAU;

/// Builds the randomized closed polygon that seeds a loop.
///
/// Pure: the only input besides the center and distance is the injected
/// random source, so a seeded rng always yields the same polygon.
#[derive(Debug, Clone)]
pub struct WaypointGenerator {
    circumference_factor: f64,
    point_count: PointCount,
}

impl Default for WaypointGenerator {
    fn default() -> Self {
        Self::new(&LoopGeneratorConfig::default())
    }
}

impl WaypointGenerator {
    pub fn new(config: &LoopGeneratorConfig) -> Self {
        Self {
            circumference_factor: config.circumference_factor,
            point_count: config.point_count,
        }
    }

    /// Nominal polygon radius in degrees for a target distance.
    pub fn base_radius_deg(&self, target_distance_km: f64) -> f64 {
        let circumference_km = target_distance_km * self.circumference_factor;
        (circumference_km / TAU) / KM_PER_DEGREE
    }

    /// Largest center offset an interior point can have, in degrees.
    pub fn max_offset_deg(&self, target_distance_km: f64) -> f64 {
        self.base_radius_deg(target_distance_km) * (RADIUS_FACTOR_MAX + UNDULATION_AMPLITUDE)
    }

    /// Generate `[center, p0, .., pn-1, center]` around `center`.
    ///
    /// Points are placed on an equirectangular approximation, which holds for
    /// loop-sized radii away from the poles. `target_distance_km` must be
    /// positive and finite; callers validate it.
    pub fn generate<R: Rng>(
        &self,
        center: GeoPoint,
        target_distance_km: f64,
        rng: &mut R,
    ) -> WaypointPolygon {
        let base_radius = self.base_radius_deg(target_distance_km);
        let n = match self.point_count {
            PointCount::Random { min, max } => rng.random_range(min..=max),
            PointCount::Fixed(n) => n,
        }
        .max(MIN_POINT_COUNT);

        let start_angle = rng.random_range(0.0..TAU);

        let interior: Vec<GeoPoint> = (0..n)
            .map(|i| {
                let angle = start_angle + (i as f64 / n as f64) * TAU;
                let factor = rng.random_range(RADIUS_FACTOR_MIN..=RADIUS_FACTOR_MAX);
                let undulation =
                    (i as f64 * UNDULATION_FREQUENCY).sin() * UNDULATION_AMPLITUDE * base_radius;
                let r = base_radius * factor + undulation;

                GeoPoint {
                    lat: center.lat + r * angle.sin(),
                    lng: center.lng + r * angle.cos(),
                }
            })
            .collect();

        tracing::debug!(
            points = n,
            base_radius_deg = %format!("{:.5}", base_radius),
            "Generated loop polygon with {} waypoints around ({:.4}, {:.4})",
            n, center.lat, center.lng
        );

        // Infallible: n >= MIN_POINT_COUNT
        match WaypointPolygon::close(center, interior) {
            Ok(polygon) => polygon,
            Err(e) => unreachable!("{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn paris() -> GeoPoint {
        GeoPoint::new(48.8566, 2.3522).unwrap()
    }

    #[test]
    fn test_polygon_is_closed_on_center() {
        let generator = WaypointGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);

        for distance in [1.0, 5.0, 12.5, 50.0] {
            let polygon = generator.generate(paris(), distance, &mut rng);
            let points = polygon.points();
            assert_eq!(points.first(), Some(&paris()));
            assert_eq!(points.last(), Some(&paris()));
        }
    }

    #[test]
    fn test_point_count_within_random_bounds() {
        let generator = WaypointGenerator::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            let polygon = generator.generate(paris(), 5.0, &mut rng);
            let n = polygon.interior().len();
            assert!((5..=9).contains(&n), "unexpected point count {}", n);
            assert_eq!(polygon.len(), n + 2);
            seen.insert(n);
        }

        // Both ends of the inclusive range are reachable
        assert!(seen.contains(&5));
        assert!(seen.contains(&9));
    }

    #[test]
    fn test_fixed_point_count() {
        let config = LoopGeneratorConfig {
            point_count: PointCount::Fixed(6),
            ..LoopGeneratorConfig::default()
        };
        let generator = WaypointGenerator::new(&config);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            assert_eq!(generator.generate(paris(), 5.0, &mut rng).interior().len(), 6);
        }
    }

    #[test]
    fn test_interior_points_within_envelope() {
        let generator = WaypointGenerator::default();
        let mut rng = StdRng::seed_from_u64(99);

        for distance in [1.0, 3.5, 5.0, 21.1, 42.2, 50.0] {
            let base = generator.base_radius_deg(distance);
            for _ in 0..50 {
                let polygon = generator.generate(paris(), distance, &mut rng);
                for point in polygon.interior() {
                    let offset = point.degree_offset_from(&paris());
                    assert!(offset <= 1.6 * base + 1e-12);
                    assert!(offset >= 0.4 * base - 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_paris_five_km_example() {
        let generator = WaypointGenerator::default();
        let base = generator.base_radius_deg(5.0);

        // 2.5km circumference -> ~0.398km radius -> ~0.00358 degrees
        assert!((base - 0.00358).abs() < 0.00001, "base radius {}", base);
        assert!((generator.max_offset_deg(5.0) - 0.0057).abs() < 0.0001);

        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..100 {
            let polygon = generator.generate(paris(), 5.0, &mut rng);
            let farthest = polygon
                .interior()
                .iter()
                .map(|p| p.degree_offset_from(&paris()))
                .fold(0.0, f64::max);
            assert!(farthest <= generator.max_offset_deg(5.0) + 1e-12);
        }
    }

    #[test]
    fn test_same_seed_same_polygon() {
        let generator = WaypointGenerator::default();

        let a = generator.generate(paris(), 8.0, &mut StdRng::seed_from_u64(42));
        let b = generator.generate(paris(), 8.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);

        let c = generator.generate(paris(), 8.0, &mut StdRng::seed_from_u64(43));
        assert_ne!(a, c);
    }

    #[test]
    fn test_consecutive_calls_differ() {
        let generator = WaypointGenerator::default();
        let mut rng = StdRng::seed_from_u64(5);

        let first = generator.generate(paris(), 5.0, &mut rng);
        let second = generator.generate(paris(), 5.0, &mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn test_points_spread_around_center() {
        let config = LoopGeneratorConfig {
            point_count: PointCount::Fixed(8),
            ..LoopGeneratorConfig::default()
        };
        let generator = WaypointGenerator::new(&config);
        let polygon = generator.generate(paris(), 10.0, &mut StdRng::seed_from_u64(1));

        // Evenly spaced angles: points fall on both sides of the center on both axes
        let interior = polygon.interior();
        assert!(interior.iter().any(|p| p.lat > paris().lat));
        assert!(interior.iter().any(|p| p.lat < paris().lat));
        assert!(interior.iter().any(|p| p.lng > paris().lng));
        assert!(interior.iter().any(|p| p.lng < paris().lng));
    }
}
