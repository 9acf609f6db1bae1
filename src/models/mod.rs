pub mod distance;
pub mod geo;
pub mod geo_point;
pub mod loop_route;

pub use distance::{DistanceKm, DistanceMeters};
pub use geo::BoundingBox;
pub use geo_point::GeoPoint;
pub use loop_route::{
    AttemptOutcome, BatchReport, Loop, LoopDraft, LoopRequest, RoutedPath, RoutingProfile,
    WaypointPolygon,
};
