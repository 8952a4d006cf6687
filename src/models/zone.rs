//! Geofenced restricted zone.

use serde::{Deserialize, Serialize};

use super::TimeWindow;
use crate::geometry::{self, Point};

/// Identifier of a [`RestrictedZone`].
pub type ZoneId = u32;

/// A simple polygon agents should avoid flying through.
///
/// The active window is informational: zone avoidance applies at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedZone {
    id: ZoneId,
    coordinates: Vec<Point>,
    active_time: TimeWindow,
}

impl RestrictedZone {
    /// Creates a zone from its ordered vertices and active window.
    pub fn new(id: ZoneId, coordinates: Vec<Point>, active_time: TimeWindow) -> Self {
        Self {
            id,
            coordinates,
            active_time,
        }
    }

    /// Zone ID.
    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// Polygon vertices in order.
    pub fn vertices(&self) -> &[Point] {
        &self.coordinates
    }

    /// Active window.
    pub fn active_time(&self) -> &TimeWindow {
        &self.active_time
    }

    /// Whether the zone's active window covers `minutes` past midnight.
    pub fn is_active_at(&self, minutes: f64) -> bool {
        self.active_time.contains(minutes)
    }

    /// Whether the straight leg `a-b` touches this zone.
    pub fn blocks(&self, a: Point, b: Point) -> bool {
        geometry::segment_crosses_polygon(a, b, &self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> RestrictedZone {
        RestrictedZone::new(
            1,
            vec![
                Point::new(40.0, -10.0),
                Point::new(60.0, -10.0),
                Point::new(60.0, 10.0),
                Point::new(40.0, 10.0),
            ],
            TimeWindow::parse("09:30", "11:00").expect("valid"),
        )
    }

    #[test]
    fn test_blocks() {
        let z = zone();
        assert!(z.blocks(Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
        assert!(!z.blocks(Point::new(0.0, 50.0), Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_is_active_at() {
        let z = zone();
        assert!(!z.is_active_at(560.0));
        assert!(z.is_active_at(600.0));
    }

    #[test]
    fn test_zone_wire_format() {
        let json = r#"{"id":4,"coordinates":[[0,0],[1,0],[1,1]],"active_time":["10:00","12:00"]}"#;
        let z: RestrictedZone = serde_json::from_str(json).expect("deserialize");
        assert_eq!(z.vertices().len(), 3);
        assert_eq!(z.active_time().start(), 600.0);
    }
}
