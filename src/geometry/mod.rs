//! Planar geometry used for restricted-zone detection.
//!
//! - [`Point`]: 2-D position
//! - [`point_in_polygon`]: ray-casting parity test
//! - [`segments_intersect`]: orientation-based segment intersection
//! - [`segment_crosses_polygon`]: whether a straight leg touches a zone

mod point;
mod polygon;

pub use point::Point;
pub use polygon::{point_in_polygon, segment_crosses_polygon, segments_intersect};
