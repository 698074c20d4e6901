use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A point and facing inside a named world.
///
/// The world travels as its identifier; resolving it against the host's live
/// world registry is the caller's concern and may come up empty there, not
/// here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub position: DVec3,
    /// Horizontal facing, degrees.
    pub yaw: f32,
    /// Vertical facing, degrees.
    pub pitch: f32,
}

impl Location {
    pub fn new(world: impl Into<String>, position: DVec3, yaw: f32, pitch: f32) -> Self {
        Self {
            world: world.into(),
            position,
            yaw,
            pitch,
        }
    }

    /// Straight-line distance to another location, ignoring worlds.
    pub fn distance(&self, other: &Location) -> f64 {
        self.position.distance(other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_default_is_origin() {
        let loc = Location::default();
        assert_eq!(loc.world, "");
        assert_eq!(loc.position, DVec3::ZERO);
        assert_eq!(loc.yaw, 0.0);
        assert_eq!(loc.pitch, 0.0);
    }

    #[test]
    fn location_distance_ignores_facing() {
        let a = Location::new("hub", DVec3::new(0.0, 0.0, 0.0), 90.0, -12.5);
        let b = Location::new("hub", DVec3::new(3.0, 4.0, 0.0), 0.0, 0.0);
        assert_eq!(a.distance(&b), 5.0);
    }
}
