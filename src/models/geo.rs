use crate::models::GeoPoint;
use geo::{BoundingRect, LineString};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl BoundingBox {
    /// Smallest box enclosing every point of the path. `None` for an empty path.
    pub fn from_path(path: &[GeoPoint]) -> Option<Self> {
        let line: LineString<f64> = path.iter().map(|p| (p.lng, p.lat)).collect();
        let rect = line.bounding_rect()?;

        Some(BoundingBox {
            south_west: GeoPoint {
                lat: rect.min().y,
                lng: rect.min().x,
            },
            north_east: GeoPoint {
                lat: rect.max().y,
                lng: rect.max().x,
            },
        })
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }
}
